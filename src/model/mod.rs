pub mod clusters;
pub mod counts;
pub mod membership;
pub mod params;
pub mod profiles;
pub mod scores;
