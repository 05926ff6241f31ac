/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network 模块的类型定义
 */

use crate::nn::ModuleType;
use crate::nn::Connection;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// 模块在网络中的稳定标识（即其在模块 arena 中的下标，按注册顺序递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(in crate::nn) usize);

impl ModuleId {
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// 连接在网络中的稳定标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(in crate::nn) usize);

impl ConnectionId {
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// 注册模块后得到的轻量句柄，用于构造连接（连接只持有 id，不持有模块本身）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRef {
    id: ModuleId,
    indim: usize,
    outdim: usize,
}

impl ModuleRef {
    pub(in crate::nn) const fn new(id: ModuleId, indim: usize, outdim: usize) -> Self {
        Self { id, indim, outdim }
    }

    pub const fn id(&self) -> ModuleId {
        self.id
    }

    pub const fn indim(&self) -> usize {
        self.indim
    }

    pub const fn outdim(&self) -> usize {
        self.outdim
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleTag {
    Input,
    Output,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionTag {
    Normal,
    /// 使用源模块上一时间步的输出，不参与无环检查
    Recurrent,
}

/// 拓扑序缓存的状态机：任何结构变化都会回到 Unsorted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortState {
    Unsorted,
    Sorted { order: Vec<ModuleId> },
}

/// 单个时间步上某模块的缓冲区
#[derive(Debug, Clone)]
pub(in crate::nn::network) struct StepBuffers {
    /// 外部写入的输入（仅输入模块非零）
    pub(in crate::nn::network) external: Array1<f32>,
    pub(in crate::nn::network) input: Array1<f32>,
    pub(in crate::nn::network) output: Array1<f32>,
    /// 外部写入的输出误差（仅输出模块非零）
    pub(in crate::nn::network) external_err: Array1<f32>,
    pub(in crate::nn::network) outerr: Array1<f32>,
    pub(in crate::nn::network) inerr: Array1<f32>,
}

impl StepBuffers {
    pub(in crate::nn::network) fn zeros(indim: usize, outdim: usize) -> Self {
        Self {
            external: Array1::zeros(indim),
            input: Array1::zeros(indim),
            output: Array1::zeros(outdim),
            external_err: Array1::zeros(outdim),
            outerr: Array1::zeros(outdim),
            inerr: Array1::zeros(indim),
        }
    }
}

pub(in crate::nn::network) struct ModuleSlot {
    pub(in crate::nn::network) name: String,
    pub(in crate::nn::network) unit: ModuleType,
    pub(in crate::nn::network) tag: ModuleTag,
    /// 按时间步排列的缓冲区；前馈网络只有第 0 步
    pub(in crate::nn::network) steps: Vec<StepBuffers>,
}

pub(in crate::nn::network) struct ConnectionSlot {
    pub(in crate::nn::network) connection: Connection,
    pub(in crate::nn::network) tag: ConnectionTag,
}
