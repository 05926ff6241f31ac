mod module_unit;
mod network_backward;
mod network_describe;
mod network_params;

use crate::nn::{Connection, ModuleRef};
use approx::assert_abs_diff_eq;
use ndarray::Array1;

/// 构造一条全连接并写入指定权重（行优先 outdim × indim）
fn full_with(source: &ModuleRef, dest: &ModuleRef, weights: &[f32]) -> Connection {
    let mut connection = Connection::full(source, dest).unwrap();
    connection.set_parameters(weights).unwrap();
    connection
}

fn assert_values(actual: &Array1<f32>, expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "长度不一致：{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-5);
    }
}
