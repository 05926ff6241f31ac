/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 网络结构（模块、连接、共享参数、网络）的错误类型
 */

use super::network::ModuleId;
use thiserror::Error;

/// 网络结构操作错误类型
///
/// 本 crate 中的错误均为编程/配置错误：一旦出现立即返回给调用者，不做任何自动重试。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    /// 普通（非循环）连接构成了环
    #[error("There is a loop in the network：{0}")]
    CyclicGraph(String),
    /// 模块名称在网络中重复
    #[error("名称重复：{0}")]
    DuplicateName(String),
    /// 切片越界、参数长度不一致等维度问题
    #[error("维度不匹配：期望{expected}，实际{got}。{message}")]
    Dimension {
        expected: usize,
        got: usize,
        message: String,
    },
    /// 试图直接修改共享连接（而非其母连接）的参数或梯度
    #[error("所有权冲突：{0}")]
    OwnershipViolation(String),
    #[error("模块{0:?}不在网络中")]
    ModuleNotFound(ModuleId),
    #[error("非法操作：{0}")]
    InvalidOperation(String),
}
