/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 整个网络的扁平参数视图
 *
 * 拼接顺序：先按注册顺序取各模块自有参数，再按注册顺序取各连接的参数；
 * 共享连接不单独占位，其母连接在第一次出现时计入且只计一次。
 * 通过网络写参数/清梯度时，共享部分总是写到母连接上。
 */

use super::Network;
use crate::nn::connection::ParamStore;
use crate::nn::{MotherConnection, NetworkError, TraitModule};
use ndarray::Array1;

enum ParamOwner {
    Module(usize),
    Connection(usize),
    Mother(MotherConnection),
}

impl Network {
    fn param_owners(&self) -> Vec<ParamOwner> {
        let mut owners = Vec::new();
        for (index, module) in self.modules.iter().enumerate() {
            if module.unit.params().is_some_and(|p| p.paramdim() > 0) {
                owners.push(ParamOwner::Module(index));
            }
        }

        let mut seen_mothers: Vec<&MotherConnection> = Vec::new();
        for (index, slot) in self.connections.iter().enumerate() {
            match slot.connection.store() {
                ParamStore::Owned(params) => {
                    if params.paramdim() > 0 {
                        owners.push(ParamOwner::Connection(index));
                    }
                }
                ParamStore::Shared(mother) => {
                    if !seen_mothers.iter().any(|m| m.ptr_eq(mother)) {
                        seen_mothers.push(mother);
                        owners.push(ParamOwner::Mother(mother.clone()));
                    }
                }
            }
        }
        owners
    }

    fn collect_from_owners(
        &self,
        read: impl Fn(&ParamOwner) -> Array1<f32>,
    ) -> Array1<f32> {
        self.param_owners()
            .iter()
            .flat_map(|owner| read(owner).to_vec())
            .collect()
    }

    /// 网络中（去重后）的参数总数
    pub fn param_dim(&self) -> usize {
        self.param_owners()
            .iter()
            .map(|owner| self.owner_parameters(owner).len())
            .sum()
    }

    pub fn parameters(&self) -> Array1<f32> {
        self.collect_from_owners(|owner| self.owner_parameters(owner))
    }

    pub fn derivatives(&self) -> Array1<f32> {
        self.collect_from_owners(|owner| self.owner_derivatives(owner))
    }

    fn owner_parameters(&self, owner: &ParamOwner) -> Array1<f32> {
        match owner {
            ParamOwner::Module(index) => self.modules[*index]
                .unit
                .params()
                .map(|p| p.parameters().clone())
                .unwrap_or_else(|| Array1::zeros(0)),
            ParamOwner::Connection(index) => self.connections[*index].connection.parameters(),
            ParamOwner::Mother(mother) => mother.parameters(),
        }
    }

    fn owner_derivatives(&self, owner: &ParamOwner) -> Array1<f32> {
        match owner {
            ParamOwner::Module(index) => self.modules[*index]
                .unit
                .params()
                .map(|p| p.derivatives().clone())
                .unwrap_or_else(|| Array1::zeros(0)),
            ParamOwner::Connection(index) => self.connections[*index].connection.derivatives(),
            ParamOwner::Mother(mother) => mother.derivatives(),
        }
    }

    /// 整体覆写网络参数；长度不符时不做任何修改
    pub fn set_parameters(&mut self, values: &[f32]) -> Result<(), NetworkError> {
        let owners = self.param_owners();
        let dims = owners
            .iter()
            .map(|owner| self.owner_parameters(owner).len())
            .collect::<Vec<_>>();
        let total = dims.iter().sum::<usize>();
        if values.len() != total {
            return Err(NetworkError::Dimension {
                expected: total,
                got: values.len(),
                message: format!("网络{}的参数总数不匹配", self.name),
            });
        }

        let mut start = 0;
        for (owner, dim) in owners.iter().zip(dims) {
            let chunk = &values[start..start + dim];
            match owner {
                ParamOwner::Module(index) => {
                    if let Some(params) = self.modules[*index].unit.params_mut() {
                        params.set_parameters(chunk)?;
                    }
                }
                ParamOwner::Connection(index) => {
                    self.connections[*index].connection.set_parameters(chunk)?;
                }
                ParamOwner::Mother(mother) => mother.set_parameters(chunk)?,
            }
            start += dim;
        }
        Ok(())
    }

    /// 清零所有梯度（共享部分经由母连接清零）
    pub fn reset_derivatives(&mut self) -> Result<(), NetworkError> {
        for owner in self.param_owners() {
            match owner {
                ParamOwner::Module(index) => {
                    if let Some(params) = self.modules[index].unit.params_mut() {
                        params.reset_derivatives();
                    }
                }
                ParamOwner::Connection(index) => {
                    self.connections[index].connection.reset_derivatives()?;
                }
                ParamOwner::Mother(mother) => mother.reset_derivatives(),
            }
        }
        Ok(())
    }
}
