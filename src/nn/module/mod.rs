/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 模块（网络中的处理单元）的统一接口
 *
 * 网络只关心模块的“单元能力”：输入/输出宽度、前向变换、反向求导，以及（可选的）自有参数。
 * 具体的传递函数分散在子模块中：
 * - linear.rs: 恒等传递
 * - activation.rs: sigmoid / tanh
 * - bias.rs: 偏置单元与带参偏置层
 */

mod activation;
mod bias;
mod linear;

pub use activation::{SigmoidLayer, TanhLayer};
pub use bias::{BiasLayer, BiasUnit};
pub use linear::LinearLayer;

use super::{NetworkError, ParameterContainer};
use enum_dispatch::enum_dispatch;
use ndarray::Array1;

#[enum_dispatch]
pub enum ModuleType {
    LinearLayer(LinearLayer),
    SigmoidLayer(SigmoidLayer),
    TanhLayer(TanhLayer),
    BiasUnit(BiasUnit),
    BiasLayer(BiasLayer),
}

#[enum_dispatch(ModuleType)]
pub trait TraitModule {
    /// 模块类型名（用于自动生成模块名称、描述网络）
    fn kind(&self) -> &'static str;

    fn indim(&self) -> usize;

    fn outdim(&self) -> usize;

    // 由网络保证`input`的长度等于`indim()`
    fn forward(&self, input: &Array1<f32>) -> Array1<f32>;

    /// 根据输出误差计算输入误差；若模块持有参数，同时把梯度累加到自身参数容器中
    fn backward(
        &mut self,
        outerr: &Array1<f32>,
        input: &Array1<f32>,
        output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError>;

    fn params(&self) -> Option<&ParameterContainer> {
        None
    }

    fn params_mut(&mut self) -> Option<&mut ParameterContainer> {
        None
    }
}
