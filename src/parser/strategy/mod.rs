pub mod delimited;
pub mod key_value;
pub mod loose;
pub mod markdown;
pub mod proximity;
pub mod slash_triple;
pub mod timestamped;
