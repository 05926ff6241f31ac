/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 参数容器：一段扁平参数缓冲区 + 等长的梯度累加缓冲区
 */

use super::NetworkError;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 参数初始化配置
///
/// - `std`: 零均值正态分布的标准差
/// - `seed`: 固定种子（确保可重复性），None 表示使用 thread_rng（非确定性）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamInit {
    pub std: f32,
    pub seed: Option<u64>,
}

impl Default for ParamInit {
    fn default() -> Self {
        Self { std: 1.0, seed: None }
    }
}

impl ParamInit {
    pub const fn new(std: f32) -> Self {
        Self { std, seed: None }
    }

    pub const fn seeded(std: f32, seed: u64) -> Self {
        Self {
            std,
            seed: Some(seed),
        }
    }

    /// 按本配置生成`n`个零均值正态分布采样值
    ///
    /// `std`不是有限值时无法采样，退化为全零参数。
    pub(in crate::nn) fn sample(&self, n: usize) -> Array1<f32> {
        if !self.std.is_finite() {
            log::warn!("参数初始化的标准差{}不是有限值，参数置为 0", self.std);
            return Array1::zeros(n);
        }
        match self.seed {
            Some(seed) => sample_normal(&mut StdRng::seed_from_u64(seed), self.std, n),
            None => sample_normal(&mut rand::thread_rng(), self.std, n),
        }
    }
}

// Box-Muller 变换
fn sample_normal<R: Rng>(rng: &mut R, std_dev: f32, n: usize) -> Array1<f32> {
    let mut data = Vec::with_capacity(n);
    while data.len() < n {
        let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
        let u2: f32 = rng.gen_range(0.0..1.0);
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f32::consts::PI * u2;
        let z0 = std_dev * r * theta.cos();
        let z1 = std_dev * r * theta.sin();

        if z0.is_finite() {
            data.push(z0);
        }
        if data.len() < n && z1.is_finite() {
            data.push(z1);
        }
    }
    Array1::from(data)
}

/// 参数容器
///
/// 不变式：`parameters.len() == gradient.len() == paramdim`，任何操作后都成立。
/// 梯度只做累加（见[`accumulate_derivatives`](Self::accumulate_derivatives)），
/// 由持有者决定何时清零。
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterContainer {
    parameters: Array1<f32>,
    gradient: Array1<f32>,
}

impl ParameterContainer {
    pub fn new(paramdim: usize, init: ParamInit) -> Self {
        let mut container = Self::empty();
        container.init_params(paramdim, init);
        container
    }

    /// 不含任何参数的容器（paramdim = 0）
    pub fn empty() -> Self {
        Self {
            parameters: Array1::zeros(0),
            gradient: Array1::zeros(0),
        }
    }

    /// 重新分配长度为`n`的参数与梯度缓冲区：参数按`init`随机初始化，梯度清零
    pub fn init_params(&mut self, n: usize, init: ParamInit) {
        self.parameters = init.sample(n);
        self.gradient = Array1::zeros(n);
    }

    pub fn paramdim(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameters(&self) -> &Array1<f32> {
        &self.parameters
    }

    pub fn set_parameters(&mut self, values: &[f32]) -> Result<(), NetworkError> {
        self.check_len(values.len(), "参数")?;
        self.parameters.assign(&Array1::from(values.to_vec()));
        Ok(())
    }

    pub fn derivatives(&self) -> &Array1<f32> {
        &self.gradient
    }

    pub fn reset_derivatives(&mut self) {
        self.gradient.fill(0.);
    }

    /// 将`delta`逐元素累加到梯度上（从不覆盖）
    pub fn accumulate_derivatives(&mut self, delta: &Array1<f32>) -> Result<(), NetworkError> {
        self.check_len(delta.len(), "梯度增量")?;
        self.gradient += delta;
        Ok(())
    }

    fn check_len(&self, got: usize, what: &str) -> Result<(), NetworkError> {
        if got != self.paramdim() {
            return Err(NetworkError::Dimension {
                expected: self.paramdim(),
                got,
                message: format!("{what}长度须与 paramdim 一致"),
            });
        }
        Ok(())
    }
}

impl Default for ParameterContainer {
    fn default() -> Self {
        Self::empty()
    }
}
