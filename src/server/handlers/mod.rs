pub mod quotes;
pub mod zones;
