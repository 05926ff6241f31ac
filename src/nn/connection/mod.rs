/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 连接（Connection）：从源模块输出切片到目标模块输入切片的有向带参边
 *
 * 一条连接由两部分正交组成：
 * - 传递方式 `Transfer`：全连接 / 恒等连接，决定 paramdim 与前向/反向数学
 * - 参数存放 `ParamStore`：自有（Owned）或委托给母连接（Shared）
 *
 * 因此“共享全连接”= Transfer::Full + ParamStore::Shared，数学部分完全复用。
 */

mod full;
mod shared;

pub use shared::MotherConnection;

use super::network::{ModuleId, ModuleRef};
use super::{NetworkError, ParamInit, ParameterContainer};
use ndarray::{Array1, s};
use std::ops::Range;

/// 连接的传递方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// paramdim = 源切片宽 × 目标切片宽
    Full,
    /// paramdim = 0，要求两侧切片等宽
    Identity,
}

impl Transfer {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Identity => "identity",
        }
    }
}

/// 连接参数的存放方式
#[derive(Debug, Clone)]
pub enum ParamStore {
    Owned(ParameterContainer),
    Shared(MotherConnection),
}

#[derive(Debug, Clone)]
pub struct Connection {
    source: ModuleId,
    dest: ModuleId,
    /// 源模块输出上的切片
    in_slice: Range<usize>,
    /// 目标模块输入上的切片
    out_slice: Range<usize>,
    transfer: Transfer,
    store: ParamStore,
    name: Option<String>,
}

// ========== 创建 ==========

impl Connection {
    /// 覆盖源模块全部输出与目标模块全部输入的全连接
    pub fn full(source: &ModuleRef, dest: &ModuleRef) -> Result<Self, NetworkError> {
        Self::full_sliced(source, dest, 0..source.outdim(), 0..dest.indim())
    }

    pub fn full_sliced(
        source: &ModuleRef,
        dest: &ModuleRef,
        in_slice: Range<usize>,
        out_slice: Range<usize>,
    ) -> Result<Self, NetworkError> {
        Self::build(source, dest, in_slice, out_slice, Transfer::Full, None)
    }

    pub fn identity(source: &ModuleRef, dest: &ModuleRef) -> Result<Self, NetworkError> {
        Self::identity_sliced(source, dest, 0..source.outdim(), 0..dest.indim())
    }

    pub fn identity_sliced(
        source: &ModuleRef,
        dest: &ModuleRef,
        in_slice: Range<usize>,
        out_slice: Range<usize>,
    ) -> Result<Self, NetworkError> {
        Self::build(source, dest, in_slice, out_slice, Transfer::Identity, None)
    }

    /// 共享全连接：拓扑上是一条普通全连接，参数与梯度全部委托给`mother`
    pub fn shared_full(
        mother: &MotherConnection,
        source: &ModuleRef,
        dest: &ModuleRef,
    ) -> Result<Self, NetworkError> {
        Self::shared_full_sliced(mother, source, dest, 0..source.outdim(), 0..dest.indim())
    }

    pub fn shared_full_sliced(
        mother: &MotherConnection,
        source: &ModuleRef,
        dest: &ModuleRef,
        in_slice: Range<usize>,
        out_slice: Range<usize>,
    ) -> Result<Self, NetworkError> {
        Self::build(
            source,
            dest,
            in_slice,
            out_slice,
            Transfer::Full,
            Some(mother),
        )
    }

    fn build(
        source: &ModuleRef,
        dest: &ModuleRef,
        in_slice: Range<usize>,
        out_slice: Range<usize>,
        transfer: Transfer,
        mother: Option<&MotherConnection>,
    ) -> Result<Self, NetworkError> {
        check_slice(&in_slice, source.outdim(), "源模块输出")?;
        check_slice(&out_slice, dest.indim(), "目标模块输入")?;

        let indim = in_slice.len();
        let outdim = out_slice.len();
        let paramdim = match transfer {
            Transfer::Full => indim * outdim,
            Transfer::Identity => {
                if indim != outdim {
                    return Err(NetworkError::Dimension {
                        expected: indim,
                        got: outdim,
                        message: "恒等连接两侧切片必须等宽".to_string(),
                    });
                }
                0
            }
        };

        let store = match mother {
            Some(mother) => {
                if mother.paramdim() != paramdim {
                    return Err(NetworkError::Dimension {
                        expected: paramdim,
                        got: mother.paramdim(),
                        message: format!(
                            "母连接{}的参数个数与共享连接所需不一致",
                            mother.name().unwrap_or("<unnamed>")
                        ),
                    });
                }
                ParamStore::Shared(mother.clone())
            }
            None => ParamStore::Owned(ParameterContainer::new(paramdim, ParamInit::default())),
        };

        Ok(Self {
            source: source.id(),
            dest: dest.id(),
            in_slice,
            out_slice,
            transfer,
            store,
            name: None,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.set_name(name);
        self
    }

    /// 用指定配置重新初始化自有参数；共享连接会失败
    pub fn with_init(mut self, init: ParamInit) -> Result<Self, NetworkError> {
        self.init_params(init)?;
        Ok(self)
    }
}

fn check_slice(slice: &Range<usize>, width: usize, what: &str) -> Result<(), NetworkError> {
    if slice.start > slice.end || slice.end > width {
        return Err(NetworkError::Dimension {
            expected: width,
            got: slice.end,
            message: format!("切片{slice:?}超出{what}宽度{width}"),
        });
    }
    Ok(())
}

// ========== 基础访问器 ==========

impl Connection {
    pub const fn source(&self) -> ModuleId {
        self.source
    }

    pub const fn dest(&self) -> ModuleId {
        self.dest
    }

    pub fn in_slice(&self) -> Range<usize> {
        self.in_slice.clone()
    }

    pub fn out_slice(&self) -> Range<usize> {
        self.out_slice.clone()
    }

    pub fn indim(&self) -> usize {
        self.in_slice.len()
    }

    pub fn outdim(&self) -> usize {
        self.out_slice.len()
    }

    pub const fn transfer(&self) -> Transfer {
        self.transfer
    }

    pub fn paramdim(&self) -> usize {
        match &self.store {
            ParamStore::Owned(params) => params.paramdim(),
            ParamStore::Shared(mother) => mother.paramdim(),
        }
    }

    pub const fn is_shared(&self) -> bool {
        matches!(self.store, ParamStore::Shared(_))
    }

    pub const fn mother(&self) -> Option<&MotherConnection> {
        match &self.store {
            ParamStore::Shared(mother) => Some(mother),
            ParamStore::Owned(_) => None,
        }
    }

    pub(in crate::nn) const fn store(&self) -> &ParamStore {
        &self.store
    }

    /// 显示名称：显式名称 > 母连接名称 > None
    pub fn name(&self) -> Option<String> {
        shared::resolve_name(self.name.as_deref(), self.mother())
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }
}

// ========== 参数读写（共享连接只读） ==========

impl Connection {
    pub fn parameters(&self) -> Array1<f32> {
        self.with_params(|p| p.parameters().clone())
    }

    pub fn derivatives(&self) -> Array1<f32> {
        self.with_params(|p| p.derivatives().clone())
    }

    pub fn set_parameters(&mut self, values: &[f32]) -> Result<(), NetworkError> {
        self.owned_mut("set_parameters")?.set_parameters(values)
    }

    pub fn reset_derivatives(&mut self) -> Result<(), NetworkError> {
        self.owned_mut("reset_derivatives")?.reset_derivatives();
        Ok(())
    }

    pub fn init_params(&mut self, init: ParamInit) -> Result<(), NetworkError> {
        let n = self.paramdim();
        self.owned_mut("init_params")?.init_params(n, init);
        Ok(())
    }

    fn with_params<R>(&self, f: impl FnOnce(&ParameterContainer) -> R) -> R {
        match &self.store {
            ParamStore::Owned(params) => f(params),
            ParamStore::Shared(mother) => mother.with_params(f),
        }
    }

    fn owned_mut(&mut self, op: &str) -> Result<&mut ParameterContainer, NetworkError> {
        let name = self.name();
        match &mut self.store {
            ParamStore::Owned(params) => Ok(params),
            ParamStore::Shared(_) => Err(NetworkError::OwnershipViolation(format!(
                "共享连接{}不能直接调用{op}，请通过其母连接操作",
                name.as_deref().unwrap_or("<unnamed>")
            ))),
        }
    }
}

// ========== 前向/反向 ==========

impl Connection {
    /// 取源模块输出上本连接关心的切片
    pub(in crate::nn) fn slice_source(&self, output: &Array1<f32>) -> Array1<f32> {
        output.slice(s![self.in_slice.clone()]).to_owned()
    }

    /// 取目标模块输入误差上本连接关心的切片
    pub(in crate::nn) fn slice_dest(&self, inerr: &Array1<f32>) -> Array1<f32> {
        inerr.slice(s![self.out_slice.clone()]).to_owned()
    }

    /// 把切片宽度的贡献累加到目标模块整宽的缓冲区上
    pub(in crate::nn) fn add_to_dest(&self, contribution: &Array1<f32>, target: &mut Array1<f32>) {
        let mut view = target.slice_mut(s![self.out_slice.clone()]);
        view += contribution;
    }

    /// 把切片宽度的误差累加到源模块整宽的误差缓冲区上
    pub(in crate::nn) fn add_to_source(&self, contribution: &Array1<f32>, target: &mut Array1<f32>) {
        let mut view = target.slice_mut(s![self.in_slice.clone()]);
        view += contribution;
    }

    /// 源切片激活 -> 对目标切片输入的贡献
    pub fn forward(&self, input: &Array1<f32>) -> Result<Array1<f32>, NetworkError> {
        self.check_len(input.len(), self.indim(), "前向输入")?;
        match self.transfer {
            Transfer::Full => {
                let (indim, outdim) = (self.indim(), self.outdim());
                self.with_params(|p| full::forward(p.parameters(), indim, outdim, input))
            }
            Transfer::Identity => Ok(input.clone()),
        }
    }

    /// 目标切片误差 -> 对源切片误差的贡献；同时把参数梯度累加（不覆盖）到参数容器中
    ///
    /// `input`为本时间步前向时的源切片激活。
    pub fn backward(
        &mut self,
        outerr: &Array1<f32>,
        input: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        self.check_len(outerr.len(), self.outdim(), "反向误差")?;
        self.check_len(input.len(), self.indim(), "缓存的前向输入")?;
        match self.transfer {
            Transfer::Full => {
                let (indim, outdim) = (self.indim(), self.outdim());
                let (inerr, delta) =
                    self.with_params(|p| full::backward(p.parameters(), indim, outdim, outerr, input))?;
                match &mut self.store {
                    ParamStore::Owned(params) => params.accumulate_derivatives(&delta)?,
                    ParamStore::Shared(mother) => mother.accumulate_derivatives(&delta)?,
                }
                Ok(inerr)
            }
            Transfer::Identity => Ok(outerr.clone()),
        }
    }

    fn check_len(&self, got: usize, expected: usize, what: &str) -> Result<(), NetworkError> {
        if got != expected {
            return Err(NetworkError::Dimension {
                expected,
                got,
                message: format!("连接的{what}长度不匹配"),
            });
        }
        Ok(())
    }
}
