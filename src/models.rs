pub mod enums;
pub mod structs;

pub use enums::{DatabaseType, JoinType, LogicalOperator};
pub use structs::{
    Condition, ConditionLink, FromDefinition, JoinDefinition, LimitDefinition, Operand,
    QueryDefinition, SelectColumn, ViewDefinition,
};
