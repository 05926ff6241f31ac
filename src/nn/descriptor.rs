/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 网络描述符（Network Descriptor）
 *                 网络结构的可序列化中间表示，用于调试输出与结构比对
 */

use super::network::{ConnectionTag, ModuleTag};
use serde::{Deserialize, Serialize};

/// 网络的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub name: String,
    pub modules: Vec<ModuleDescriptor>,
    pub connections: Vec<ConnectionDescriptor>,
    /// 缓存的拓扑序（模块下标）；未排序时为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub id: usize,
    pub name: String,
    /// 模块类型名（linear/sigmoid/...）
    pub kind: String,
    pub tag: ModuleTag,
    pub indim: usize,
    pub outdim: usize,
    pub param_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 传递方式（full/identity）
    pub kind: String,
    pub tag: ConnectionTag,
    pub source: usize,
    pub dest: usize,
    /// 源模块输出上的切片 [from, to)
    pub in_slice: (usize, usize),
    /// 目标模块输入上的切片 [from, to)
    pub out_slice: (usize, usize),
    pub param_count: usize,
    pub shared: bool,
}

impl NetworkDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            modules: Vec::new(),
            connections: Vec::new(),
            order: None,
        }
    }

    /// 各模块与连接的参数量之和（共享连接按其 paramdim 逐条计入，不去重）
    pub fn total_params(&self) -> usize {
        self.modules.iter().map(|m| m.param_count).sum::<usize>()
            + self.connections.iter().map(|c| c.param_count).sum::<usize>()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
