/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 偏置相关模块
 *
 * - BiasUnit: 无输入、恒输出 1 的单元，偏置通过其出边的连接参数学习
 * - BiasLayer: output = input + b，b 由模块自身的参数容器持有
 */

use super::TraitModule;
use crate::nn::{NetworkError, ParamInit, ParameterContainer};
use ndarray::Array1;

#[derive(Debug, Clone, Default)]
pub struct BiasUnit;

impl BiasUnit {
    pub const fn new() -> Self {
        Self
    }
}

impl TraitModule for BiasUnit {
    fn kind(&self) -> &'static str {
        "bias"
    }

    fn indim(&self) -> usize {
        0
    }

    fn outdim(&self) -> usize {
        1
    }

    fn forward(&self, _input: &Array1<f32>) -> Array1<f32> {
        Array1::ones(1)
    }

    fn backward(
        &mut self,
        _outerr: &Array1<f32>,
        _input: &Array1<f32>,
        _output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        Ok(Array1::zeros(0))
    }
}

#[derive(Debug, Clone)]
pub struct BiasLayer {
    params: ParameterContainer,
}

impl BiasLayer {
    pub fn new(dim: usize, init: ParamInit) -> Self {
        Self {
            params: ParameterContainer::new(dim, init),
        }
    }
}

impl TraitModule for BiasLayer {
    fn kind(&self) -> &'static str {
        "bias_layer"
    }

    fn indim(&self) -> usize {
        self.params.paramdim()
    }

    fn outdim(&self) -> usize {
        self.params.paramdim()
    }

    fn forward(&self, input: &Array1<f32>) -> Array1<f32> {
        input + self.params.parameters()
    }

    fn backward(
        &mut self,
        outerr: &Array1<f32>,
        _input: &Array1<f32>,
        _output: &Array1<f32>,
    ) -> Result<Array1<f32>, NetworkError> {
        self.params.accumulate_derivatives(outerr)?;
        Ok(outerr.clone())
    }

    fn params(&self) -> Option<&ParameterContainer> {
        Some(&self.params)
    }

    fn params_mut(&mut self) -> Option<&mut ParameterContainer> {
        Some(&mut self.params)
    }
}
