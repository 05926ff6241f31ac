/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 拓扑排序与环检测
 *
 * 依赖图只由普通连接构成（边 source -> dest 表示 dest 的前向需要 source 的当前输出），
 * 循环连接既不参与环检测，也不参与同一时间步内的依赖。
 */

use super::{ConnectionTag, ModuleId, Network, SortState};
use crate::nn::NetworkError;
use std::collections::BTreeSet;

impl Network {
    /// 计算并缓存模块的拓扑序
    ///
    /// Kahn 算法；就绪集合按注册顺序取最小者，保证结果确定。
    /// 普通连接成环（包括自环）时返回`NetworkError::CyclicGraph`，此时状态保持 Unsorted。
    /// 已处于 Sorted 状态时直接返回缓存的顺序。
    pub fn sort_modules(&mut self) -> Result<&[ModuleId], NetworkError> {
        if !self.is_sorted() {
            let order = self.topological_order()?;
            log::debug!(
                "网络{}拓扑排序完成：{:?}",
                self.name,
                order
                    .iter()
                    .map(|id| self.modules[id.0].name.as_str())
                    .collect::<Vec<_>>()
            );
            self.state = SortState::Sorted { order };
        }
        Ok(self.cached_order())
    }

    /// 已缓存的拓扑序（Unsorted 时为空）
    pub fn module_order(&self) -> Option<&[ModuleId]> {
        match &self.state {
            SortState::Sorted { order } => Some(order),
            SortState::Unsorted => None,
        }
    }

    pub(in crate::nn::network) fn cached_order(&self) -> &[ModuleId] {
        self.module_order().unwrap_or(&[])
    }

    fn topological_order(&self) -> Result<Vec<ModuleId>, NetworkError> {
        let n = self.modules.len();
        let mut in_degree = vec![0_usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for slot in self.connections.iter().filter(|c| c.tag == ConnectionTag::Normal) {
            let (src, dst) = (slot.connection.source().0, slot.connection.dest().0);
            successors[src].push(dst);
            in_degree[dst] += 1;
        }

        let mut ready = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .collect::<BTreeSet<_>>();
        let mut order = Vec::with_capacity(n);
        while let Some(current) = ready.pop_first() {
            order.push(ModuleId(current));
            for &next in &successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < n {
            let stuck = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.modules[i].name.as_str())
                .collect::<Vec<_>>();
            return Err(NetworkError::CyclicGraph(format!(
                "网络{}中以下模块处于（或依赖于）普通连接构成的环：{:?}",
                self.name, stuck
            )));
        }
        Ok(order)
    }

    /// 前/反向入口调用：缓存失效时重新排序
    pub(in crate::nn::network) fn ensure_sorted(&mut self) -> Result<(), NetworkError> {
        self.sort_modules().map(|_| ())
    }
}
