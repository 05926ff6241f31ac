//! 数据集错误类型定义

use thiserror::Error;

/// 数据集相关错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// 字段不存在
    #[error("字段不存在: {0}")]
    UnknownField(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 形状不匹配
    #[error("字段{field}形状不匹配: 期望宽度 {expected}, 实际 {got}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        got: usize,
    },
}
