/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network describe 相关方法
 */

use super::Network;
use crate::nn::descriptor::{ConnectionDescriptor, ModuleDescriptor, NetworkDescriptor};
use crate::nn::TraitModule;

impl Network {
    /// 导出网络的描述符（模块按注册顺序，连接按注册顺序）
    ///
    /// # 示例
    /// ```ignore
    /// let descriptor = network.describe();
    /// println!("{}", descriptor.to_json().unwrap());
    /// ```
    pub fn describe(&self) -> NetworkDescriptor {
        let mut descriptor = NetworkDescriptor::new(&self.name);

        for (index, module) in self.modules.iter().enumerate() {
            descriptor.modules.push(ModuleDescriptor {
                id: index,
                name: module.name.clone(),
                kind: module.unit.kind().to_string(),
                tag: module.tag,
                indim: module.unit.indim(),
                outdim: module.unit.outdim(),
                param_count: module.unit.params().map_or(0, |p| p.paramdim()),
            });
        }

        for (index, slot) in self.connections.iter().enumerate() {
            let connection = &slot.connection;
            let (in_slice, out_slice) = (connection.in_slice(), connection.out_slice());
            descriptor.connections.push(ConnectionDescriptor {
                id: index,
                name: connection.name(),
                kind: connection.transfer().kind().to_string(),
                tag: slot.tag,
                source: connection.source().index(),
                dest: connection.dest().index(),
                in_slice: (in_slice.start, in_slice.end),
                out_slice: (out_slice.start, out_slice.end),
                param_count: connection.paramdim(),
                shared: connection.is_shared(),
            });
        }

        descriptor.order = self
            .module_order()
            .map(|order| order.iter().map(|id| id.index()).collect());
        descriptor
    }
}
