pub mod competitions;
pub mod config;
pub mod entities;
pub mod match_record;
pub mod matchweek;
pub mod news_filters;
pub mod normalize;
