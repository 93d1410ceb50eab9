mod attributes;
mod encoding;
mod item;
mod key;
mod returns;

pub use attributes::AttributeValue;
pub use encoding::{DecodeError, Decoder, Encoder, decode, encode};
pub use item::{Item, KeyValidationError};
pub use key::{KeyAttribute, KeySchema, KeyType, KeyValue, PrimaryKey, encode_key_component};
pub use returns::{ReturnValue, WriteResult};
