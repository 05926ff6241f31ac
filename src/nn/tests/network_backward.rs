use super::{assert_values, full_with};
use crate::assert_err;
use crate::nn::{
    BiasLayer, Connection, LinearLayer, Network, NetworkError, ParamInit, SigmoidLayer,
};

#[test]
fn test_backward_linear() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(2), None).unwrap();
    let output = net.add_output_module(LinearLayer::new(1), None).unwrap();
    let id = net
        .add_connection(full_with(&input, &output, &[2., 3.]))
        .unwrap();

    net.activate(&[1., 2.]).unwrap();
    let inerr = net.back_activate(&[1.]).unwrap();

    // dx = Wᵀ·dy，dW = dy ⊗ x
    assert_values(&inerr, &[2., 3.]);
    assert_values(&net.connection(id).unwrap().derivatives(), &[1., 2.]);
    assert_eq!(net.current_time_step(), 0);
}

#[test]
fn test_backward_through_sigmoid() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(1), None).unwrap();
    let hidden = net.add_module(SigmoidLayer::new(1), None).unwrap();
    let output = net.add_output_module(LinearLayer::new(1), None).unwrap();
    net.add_connection(full_with(&input, &hidden, &[0.])).unwrap();
    net.add_connection(full_with(&hidden, &output, &[1.])).unwrap();

    assert_values(&net.activate(&[1.]).unwrap(), &[0.5]);
    let inerr = net.back_activate(&[1.]).unwrap();

    // 隐藏层：outerr = 1，inerr = 1 * 0.5 * (1 - 0.5) = 0.25
    // 梯度按连接注册顺序：input->hidden = 0.25 * 1，hidden->output = 1 * 0.5
    assert_values(&net.derivatives(), &[0.25, 0.5]);
    assert_values(&inerr, &[0.]);
}

#[test]
fn test_backward_accumulates_until_reset() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(2), None).unwrap();
    let output = net.add_output_module(LinearLayer::new(1), None).unwrap();
    net.add_connection(full_with(&input, &output, &[2., 3.]))
        .unwrap();

    for _ in 0..2 {
        net.activate(&[1., 2.]).unwrap();
        net.back_activate(&[1.]).unwrap();
    }
    assert_values(&net.derivatives(), &[2., 4.]);

    net.reset_derivatives().unwrap();
    assert_values(&net.derivatives(), &[0., 0.]);
}

#[test]
fn test_backward_through_bias_layer() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(2), None).unwrap();
    let biased = net
        .add_output_module(BiasLayer::new(2, ParamInit::default()), None)
        .unwrap();
    net.add_connection(Connection::identity(&input, &biased).unwrap())
        .unwrap();

    // 恒等连接不占参数：网络参数即偏置层的两个参数
    assert_eq!(net.param_dim(), 2);
    net.set_parameters(&[1., -1.]).unwrap();

    assert_values(&net.activate(&[1., 2.]).unwrap(), &[2., 1.]);
    assert_values(&net.back_activate(&[1., 2.]).unwrap(), &[1., 2.]);
    assert_values(&net.derivatives(), &[1., 2.]);
}

#[test]
fn test_backward_errors() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(1), None).unwrap();
    let output = net.add_output_module(LinearLayer::new(2), None).unwrap();
    net.add_connection(Connection::full(&input, &output).unwrap())
        .unwrap();

    // 1. 没有待反向的时间步
    assert_err!(net.backward(), NetworkError::InvalidOperation(_));
    assert_err!(net.input_error(), NetworkError::InvalidOperation(_));

    // 2. 输出误差长度不符
    net.activate(&[1.]).unwrap();
    assert_err!(net.set_output_error(&[1.]), NetworkError::Dimension(2, 1));

    // 3. 每次前向只能反向一次
    net.back_activate(&[1., 1.]).unwrap();
    assert_err!(net.back_activate(&[1., 1.]), NetworkError::InvalidOperation(_));
}

#[test]
fn test_failed_backward_discards_output_error() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(1), None).unwrap();
    let output = net.add_output_module(LinearLayer::new(1), None).unwrap();
    net.add_connection(full_with(&input, &output, &[1.])).unwrap();

    // 1. 尚未前向：反向失败，误差不能留到之后的反向
    assert_err!(net.back_activate(&[5.]), NetworkError::InvalidOperation(_));
    net.activate(&[1.]).unwrap();
    net.backward().unwrap();
    assert_values(&net.derivatives(), &[0.]);
    assert_values(&net.input_error().unwrap(), &[0.]);

    // 2. 先写误差再直接 backward 失败，同样被丢弃
    net.set_output_error(&[5.]).unwrap();
    assert_err!(net.backward(), NetworkError::InvalidOperation(_));
    net.activate(&[1.]).unwrap();
    net.backward().unwrap();
    assert_values(&net.derivatives(), &[0.]);

    // 3. 新的前向开始后，之前写入的误差作废
    net.activate(&[1.]).unwrap();
    net.set_output_error(&[5.]).unwrap();
    net.activate(&[2.]).unwrap();
    net.backward().unwrap();
    assert_values(&net.derivatives(), &[0.]);
}
