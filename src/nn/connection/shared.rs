/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 母连接（MotherConnection）：多个共享连接共用的参数池
 *
 * 母连接不连接任何模块，只持有一份参数与梯度。共享连接通过引用计数句柄读取它，
 * 反向传播时把梯度累加进来；重置、覆写参数只能通过母连接本身完成。
 */

use crate::nn::{NetworkError, ParamInit, ParameterContainer};
use ndarray::Array1;
use std::cell::RefCell;
use std::rc::Rc;

struct MotherInner {
    name: Option<String>,
    params: RefCell<ParameterContainer>,
}

/// 母连接句柄
///
/// Clone 语义：多个句柄指向同一份参数（与`Graph`对`GraphInner`的封装方式一致）。
#[derive(Clone)]
pub struct MotherConnection {
    inner: Rc<MotherInner>,
}

impl MotherConnection {
    pub fn new(nbparams: usize, init: ParamInit, name: Option<&str>) -> Self {
        Self {
            inner: Rc::new(MotherInner {
                name: name.map(str::to_string),
                params: RefCell::new(ParameterContainer::new(nbparams, init)),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn paramdim(&self) -> usize {
        self.inner.params.borrow().paramdim()
    }

    pub fn parameters(&self) -> Array1<f32> {
        self.inner.params.borrow().parameters().clone()
    }

    pub fn set_parameters(&self, values: &[f32]) -> Result<(), NetworkError> {
        self.inner.params.borrow_mut().set_parameters(values)
    }

    pub fn derivatives(&self) -> Array1<f32> {
        self.inner.params.borrow().derivatives().clone()
    }

    pub fn reset_derivatives(&self) {
        self.inner.params.borrow_mut().reset_derivatives();
    }

    /// 按`init`重新初始化参数（维度不变，否则子连接的 paramdim 会失效）
    pub fn init_params(&self, init: ParamInit) {
        let mut params = self.inner.params.borrow_mut();
        let n = params.paramdim();
        params.init_params(n, init);
    }

    /// 两个句柄是否指向同一个母连接
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// 当前引用本母连接的其它句柄数（通常即子连接数）
    pub fn child_count(&self) -> usize {
        Rc::strong_count(&self.inner) - 1
    }

    pub(in crate::nn) fn with_params<R>(&self, f: impl FnOnce(&ParameterContainer) -> R) -> R {
        f(&self.inner.params.borrow())
    }

    pub(in crate::nn) fn accumulate_derivatives(
        &self,
        delta: &Array1<f32>,
    ) -> Result<(), NetworkError> {
        self.inner.params.borrow_mut().accumulate_derivatives(delta)
    }
}

impl std::fmt::Debug for MotherConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotherConnection")
            .field("name", &self.inner.name)
            .field("paramdim", &self.paramdim())
            .finish()
    }
}

/// 共享连接的显示名称：显式指定的名称优先，否则沿用母连接的名称
pub(crate) fn resolve_name<'a>(
    own: Option<&'a str>,
    mother: Option<&'a MotherConnection>,
) -> Option<String> {
    own.or_else(|| mother.and_then(MotherConnection::name))
        .map(str::to_string)
}
