/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 负责神经网络结构（模块、连接、共享参数、网络）的构建与前/反向传播
 */

mod connection;
mod descriptor;
mod error;
pub mod module;
mod network;
mod parameter;

pub use connection::{Connection, MotherConnection, ParamStore, Transfer};
pub use descriptor::{ConnectionDescriptor, ModuleDescriptor, NetworkDescriptor};
pub use error::NetworkError;
pub use module::{
    BiasLayer, BiasUnit, LinearLayer, ModuleType, SigmoidLayer, TanhLayer, TraitModule,
};
pub use network::{
    ConnectionId, ConnectionTag, ModuleId, ModuleRef, ModuleTag, Network, SortState,
};
pub use parameter::{ParamInit, ParameterContainer};

#[cfg(test)]
mod tests;
