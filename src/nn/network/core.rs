/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network 核心操作：创建、注册、基础访问器
 */

use super::types::{ConnectionSlot, ModuleSlot};
use super::{ConnectionId, ConnectionTag, ModuleId, ModuleRef, ModuleTag, Network, SortState};
use crate::nn::{Connection, ModuleType, NetworkError, TraitModule};
use ndarray::Array1;

impl Network {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_network")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modules: Vec::new(),
            connections: Vec::new(),
            state: SortState::Unsorted,
            offset: 0,
            pending_input: None,
            pending_outerr: None,
        }
    }

    // ========== 注册模块 ==========

    pub fn add_input_module(
        &mut self,
        unit: impl Into<ModuleType>,
        name: Option<&str>,
    ) -> Result<ModuleRef, NetworkError> {
        self.register_module(unit.into(), name, ModuleTag::Input)
    }

    pub fn add_output_module(
        &mut self,
        unit: impl Into<ModuleType>,
        name: Option<&str>,
    ) -> Result<ModuleRef, NetworkError> {
        self.register_module(unit.into(), name, ModuleTag::Output)
    }

    /// 注册一个隐藏模块
    pub fn add_module(
        &mut self,
        unit: impl Into<ModuleType>,
        name: Option<&str>,
    ) -> Result<ModuleRef, NetworkError> {
        self.register_module(unit.into(), name, ModuleTag::Hidden)
    }

    fn register_module(
        &mut self,
        unit: ModuleType,
        name: Option<&str>,
        tag: ModuleTag,
    ) -> Result<ModuleRef, NetworkError> {
        let name = self.generate_valid_new_module_name(name.unwrap_or(""), unit.kind())?;
        let id = ModuleId(self.modules.len());
        let module_ref = ModuleRef::new(id, unit.indim(), unit.outdim());
        log::trace!("网络{}注册模块{name}（{tag:?}）", self.name);
        self.modules.push(ModuleSlot {
            name,
            unit,
            tag,
            steps: Vec::new(),
        });
        self.invalidate();
        Ok(module_ref)
    }

    // ========== 注册连接 ==========

    pub fn add_connection(&mut self, connection: Connection) -> Result<ConnectionId, NetworkError> {
        self.register_connection(connection, ConnectionTag::Normal)
    }

    /// 注册循环连接：不参与无环检查，目标模块使用源模块上一时间步的输出
    pub fn add_recurrent_connection(
        &mut self,
        connection: Connection,
    ) -> Result<ConnectionId, NetworkError> {
        self.register_connection(connection, ConnectionTag::Recurrent)
    }

    fn register_connection(
        &mut self,
        connection: Connection,
        tag: ConnectionTag,
    ) -> Result<ConnectionId, NetworkError> {
        let source = self.module_ref(connection.source())?;
        let dest = self.module_ref(connection.dest())?;
        if connection.in_slice().end > source.outdim() {
            return Err(NetworkError::Dimension {
                expected: source.outdim(),
                got: connection.in_slice().end,
                message: format!("连接的源切片超出模块{}的输出宽度", self.module_name(source.id())?),
            });
        }
        if connection.out_slice().end > dest.indim() {
            return Err(NetworkError::Dimension {
                expected: dest.indim(),
                got: connection.out_slice().end,
                message: format!("连接的目标切片超出模块{}的输入宽度", self.module_name(dest.id())?),
            });
        }

        let id = ConnectionId(self.connections.len());
        self.connections.push(ConnectionSlot { connection, tag });
        self.invalidate();
        Ok(id)
    }

    /// 结构变化：拓扑序失效，时间步缓冲区随之作废
    fn invalidate(&mut self) {
        self.state = SortState::Unsorted;
        self.clear_buffers();
    }

    // ========== 名称生成 ==========

    fn check_duplicate_module_name(&self, name: &str) -> Result<(), NetworkError> {
        if self.modules.iter().any(|m| m.name == name) {
            return Err(NetworkError::DuplicateName(format!(
                "模块{}在网络{}中重复",
                name, self.name
            )));
        }
        Ok(())
    }

    fn generate_valid_new_module_name(
        &self,
        base_name: &str,
        kind: &str,
    ) -> Result<String, NetworkError> {
        if !base_name.is_empty() {
            self.check_duplicate_module_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{kind}_{counter}");
            if self.check_duplicate_module_name(&name).is_ok() {
                return Ok(name);
            }
            counter += 1;
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modules_count(&self) -> usize {
        self.modules.len()
    }

    pub fn connections_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_sorted(&self) -> bool {
        matches!(self.state, SortState::Sorted { .. })
    }

    pub const fn sort_state(&self) -> &SortState {
        &self.state
    }

    /// 含循环连接的网络按时间步展开；否则为前馈网络
    pub fn is_recurrent(&self) -> bool {
        self.connections
            .iter()
            .any(|c| c.tag == ConnectionTag::Recurrent)
    }

    /// 已前向、尚未反向的时间步数
    pub const fn current_time_step(&self) -> usize {
        self.offset
    }

    pub(in crate::nn::network) fn get_slot(&self, id: ModuleId) -> Result<&ModuleSlot, NetworkError> {
        self.modules.get(id.0).ok_or(NetworkError::ModuleNotFound(id))
    }

    pub fn module_ref(&self, id: ModuleId) -> Result<ModuleRef, NetworkError> {
        let slot = self.get_slot(id)?;
        Ok(ModuleRef::new(id, slot.unit.indim(), slot.unit.outdim()))
    }

    pub fn module_name(&self, id: ModuleId) -> Result<&str, NetworkError> {
        Ok(&self.get_slot(id)?.name)
    }

    pub fn module_tag(&self, id: ModuleId) -> Result<ModuleTag, NetworkError> {
        Ok(self.get_slot(id)?.tag)
    }

    pub fn module(&self, id: ModuleId) -> Result<&ModuleType, NetworkError> {
        Ok(&self.get_slot(id)?.unit)
    }

    pub fn find_module(&self, name: &str) -> Option<ModuleRef> {
        self.modules
            .iter()
            .position(|m| m.name == name)
            .and_then(|index| self.module_ref(ModuleId(index)).ok())
    }

    /// 按注册顺序排列的全部模块
    pub fn module_ids(&self) -> Vec<ModuleId> {
        (0..self.modules.len()).map(ModuleId).collect()
    }

    pub fn input_modules(&self) -> Vec<ModuleId> {
        self.modules_tagged(ModuleTag::Input)
    }

    pub fn output_modules(&self) -> Vec<ModuleId> {
        self.modules_tagged(ModuleTag::Output)
    }

    fn modules_tagged(&self, tag: ModuleTag) -> Vec<ModuleId> {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, m)| m.tag == tag)
            .map(|(index, _)| ModuleId(index))
            .collect()
    }

    /// 所有输入模块的输入宽度之和
    pub fn indim(&self) -> usize {
        self.input_modules()
            .iter()
            .map(|id| self.modules[id.0].unit.indim())
            .sum()
    }

    /// 所有输出模块的输出宽度之和
    pub fn outdim(&self) -> usize {
        self.output_modules()
            .iter()
            .map(|id| self.modules[id.0].unit.outdim())
            .sum()
    }

    pub fn connection(&self, id: ConnectionId) -> Result<&Connection, NetworkError> {
        self.connections
            .get(id.0)
            .map(|slot| &slot.connection)
            .ok_or_else(|| NetworkError::InvalidOperation(format!("连接{id:?}不在网络{}中", self.name)))
    }

    /// 连接的拓扑在创建后不可变；这里只开放参数层面的修改
    pub fn connection_mut(&mut self, id: ConnectionId) -> Result<&mut Connection, NetworkError> {
        let name = self.name.clone();
        self.connections
            .get_mut(id.0)
            .map(|slot| &mut slot.connection)
            .ok_or_else(|| NetworkError::InvalidOperation(format!("连接{id:?}不在网络{name}中")))
    }

    pub fn connection_tag(&self, id: ConnectionId) -> Result<ConnectionTag, NetworkError> {
        self.connection(id)?;
        Ok(self.connections[id.0].tag)
    }

    /// 模块最近一次前向的输出（尚未前向时为 None）
    pub fn module_output(&self, id: ModuleId) -> Result<Option<&Array1<f32>>, NetworkError> {
        Ok(self.get_slot(id)?.steps.last().map(|step| &step.output))
    }

    /// 模块在指定时间步的输出
    pub fn module_output_at(
        &self,
        id: ModuleId,
        time_step: usize,
    ) -> Result<Option<&Array1<f32>>, NetworkError> {
        Ok(self.get_slot(id)?.steps.get(time_step).map(|step| &step.output))
    }

    // ========== 重置 ==========

    /// 清空所有时间步缓冲区与时间偏移（循环状态归零），不影响参数与梯度
    pub fn reset(&mut self) {
        self.clear_buffers();
        log::debug!("网络{}已重置", self.name);
    }

    fn clear_buffers(&mut self) {
        for module in &mut self.modules {
            module.steps.clear();
        }
        self.offset = 0;
        self.pending_input = None;
        self.pending_outerr = None;
    }
}
