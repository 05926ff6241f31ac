//! 数据集模块
//!
//! 提供学习循环与网络之间交换样本所用的数据容器。
//!
//! # 主要组件
//!
//! - [`ReinforcementDataSet`]: 按序列（episode）组织的 (state, action, reward) 样本集
//! - [`DataError`]: 数据集错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use only_brain::data::ReinforcementDataSet;
//!
//! let mut ds = ReinforcementDataSet::new(3, 2);
//! ds.add_sample(&[0.1, 0.2, 0.3], &[1.0, 0.0], 1.0)?;
//! ds.new_sequence();
//! ds.add_sample(&[0.4, 0.5, 0.6], &[0.0, 1.0], -1.0)?;
//!
//! // 每个序列一行：该序列所有 reward 之和
//! let returns = ds.sum_over_sequences("reward")?;
//! ```

pub mod error;
mod reinforcement;


// Re-exports
pub use error::DataError;
pub use reinforcement::ReinforcementDataSet;
