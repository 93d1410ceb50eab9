pub mod batch;
pub mod condition;
pub mod engine;
pub mod error;
pub mod index;
pub mod interpreter;
pub mod query;
pub mod storage;
pub mod stream;
pub mod table;
pub mod transaction;
pub mod types;
pub mod update;
pub mod utils;

pub use batch::{
    BatchExecutor, BatchGetRequest, BatchGetResult, BatchWriteItem, BatchWriteRequest,
    BatchWriteResult,
};
pub use engine::{
    BillingMode, CreateTableSpec, Engine, EngineError, EngineResult, FailureMode,
    PlaceholderValidator, StreamSettings, TableDescription, TableState, ValidationRequest,
    validate_batch_write_shape,
};
pub use error::{StorageError, StorageResult, TableError, TableResult, TransactionCancelReason};
pub use interpreter::{DispatchStrategy, InterpreterRegistry, MatchOutcome};
pub use stream::{StreamEvent, StreamLog, StreamRecord, ViewType};
pub use index::{GlobalSecondaryIndex, GsiBuilder, LocalSecondaryIndex, LsiBuilder, Projection};
pub use query::{KeyCondition, QueryOptions, QueryResult, SortKeyOp};
pub use storage::{MemoryStorage, Storage, StorageExt};
pub use table::{
    DeleteRequest, GetRequest, PutRequest, QueryRequest, ScanRequest, Table, TableBuilder,
    UpdateRequest,
};
pub use transaction::{
    TransactGetItem, TransactGetRequest, TransactGetResult, TransactWriteItem,
    TransactWriteRequest, TransactionExecutor, TransactionFailureReason,
};
pub use types::{
    AttributeValue, DecodeError, Item, KeyAttribute, KeySchema, KeyType, KeyValidationError,
    KeyValue, PrimaryKey, ReturnValue, WriteResult, encode_key_component,
};
pub use update::{UpdateAction, UpdateExecutor, UpdateExpression};
pub use utils::{
    add_numeric_strings, compare_key_values, compare_numeric_strings, escape_key_chars,
    numbers_equal,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
