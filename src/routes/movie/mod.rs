mod handler;
mod model;

pub use handler::{
    anime, by_category, by_country, by_year, categories, countries, movie_detail, movies,
    new_movies, series, tv_shows,
};
pub(crate) use model::{items_of, validate_page};
