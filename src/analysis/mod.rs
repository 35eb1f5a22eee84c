pub mod signals;
pub mod technicals;
