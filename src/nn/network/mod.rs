/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network：持有模块与连接的有向图容器
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、注册模块/连接、基础访问器
 * - sort.rs: 拓扑排序 + 环检测（状态机 Unsorted -> Sorted）
 * - forward.rs: 按拓扑序逐模块前向（含循环连接的时间步语义）
 * - backward.rs: 逆拓扑序反向，累加连接/模块梯度
 * - params.rs: 整个网络的扁平参数视图（母连接只计一次）
 * - describe.rs: 生成可序列化的结构描述
 */

mod backward;
mod core;
mod describe;
mod forward;
mod params;
mod sort;
mod types;

pub use types::{ConnectionId, ConnectionTag, ModuleId, ModuleRef, ModuleTag, SortState};

use types::{ConnectionSlot, ModuleSlot};
use ndarray::Array1;

/// 网络的完整定义
///
/// 模块与连接都存放在 arena 中，连接只通过`ModuleId`引用模块，从而没有真正的引用环。
/// 拓扑序在第一次需要时惰性计算并缓存，任何结构变化都会使其失效。
///
/// 时间语义：
/// - 不含循环连接时为前馈网络，每次前向都只计算第 0 步；
/// - 含循环连接时每次前向追加一步，循环连接把源模块上一步的输出送给目标模块；
///   每次反向处理最近一个尚未反向的时间步（最新的先处理）。
pub struct Network {
    pub(in crate::nn::network) name: String,
    pub(in crate::nn::network) modules: Vec<ModuleSlot>,
    pub(in crate::nn::network) connections: Vec<ConnectionSlot>,
    pub(in crate::nn::network) state: SortState,
    /// 已前向、尚未反向的时间步数（即下一次前向的时间步下标）
    pub(in crate::nn::network) offset: usize,
    /// 下一次前向时写入输入模块的外部输入
    pub(in crate::nn::network) pending_input: Option<Array1<f32>>,
    /// 下一次反向时写入输出模块的外部误差
    pub(in crate::nn::network) pending_outerr: Option<Array1<f32>>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
