/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 全连接的前向/反向数学
 *
 * 参数按行优先存放为 (outdim × indim) 矩阵 W：
 * - forward:  y = W · x
 * - backward: dx = Wᵀ · dy，梯度增量 dW = dy ⊗ x（外积）
 */

use crate::nn::NetworkError;
use ndarray::{Array1, ArrayView2};

fn weight_view(
    params: &Array1<f32>,
    indim: usize,
    outdim: usize,
) -> Result<ArrayView2<'_, f32>, NetworkError> {
    params
        .view()
        .into_shape((outdim, indim))
        .map_err(|e| NetworkError::Dimension {
            expected: outdim * indim,
            got: params.len(),
            message: format!("全连接参数无法整理为 {outdim}×{indim} 矩阵: {e}"),
        })
}

pub(super) fn forward(
    params: &Array1<f32>,
    indim: usize,
    outdim: usize,
    input: &Array1<f32>,
) -> Result<Array1<f32>, NetworkError> {
    Ok(weight_view(params, indim, outdim)?.dot(input))
}

/// 返回（对源模块的误差贡献, 参数梯度增量）
pub(super) fn backward(
    params: &Array1<f32>,
    indim: usize,
    outdim: usize,
    outerr: &Array1<f32>,
    input: &Array1<f32>,
) -> Result<(Array1<f32>, Array1<f32>), NetworkError> {
    let w = weight_view(params, indim, outdim)?;
    let inerr = w.t().dot(outerr);
    let delta = outerr
        .iter()
        .flat_map(|&e| input.iter().map(move |&x| e * x))
        .collect::<Array1<f32>>();
    Ok((inerr, delta))
}
