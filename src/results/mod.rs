// Result module - turns Data API responses into typed values
//
// - decode: resolve a remote field into a RowValues
// - outcome: rows-affected / generated-key accessors for one execution
// - rows: cursor over the materialised records
// - row, result_set: decoded row containers

pub mod decode;
pub mod outcome;
pub mod result_set;
pub mod row;
pub mod rows;

pub use decode::decode_field;
pub use outcome::ExecutionOutcome;
pub use result_set::ResultSet;
pub use row::CustomDbRow;
pub use rows::Rows;
