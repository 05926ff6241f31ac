//! # Only Brain
//!
//! `only_brain`用纯rust实现一个以模块（Module）为节点、连接（Connection）为边的有向图神经网络容器：
//! 支持参数共享（母连接/共享连接）、循环连接、拓扑排序与环检测，
//! 以及强化学习中按序列（episode）组织的数据集。
//!

pub mod data;
pub mod nn;
pub mod utils;
