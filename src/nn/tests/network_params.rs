use super::{assert_values, full_with};
use crate::assert_err;
use crate::nn::{
    BiasLayer, Connection, ConnectionId, LinearLayer, MotherConnection, Network, NetworkError,
    ParamInit,
};

/// a(2) -> b(3)、c(2) -> d(3) 共享母连接（6 参数），另有一条自有全连接 b -> e(1)（3 参数）
fn shared_network(mother: &MotherConnection) -> (Network, ConnectionId) {
    let mut net = Network::new();
    let a = net.add_input_module(LinearLayer::new(2), Some("a")).unwrap();
    let b = net.add_output_module(LinearLayer::new(3), Some("b")).unwrap();
    let c = net.add_input_module(LinearLayer::new(2), Some("c")).unwrap();
    let d = net.add_output_module(LinearLayer::new(3), Some("d")).unwrap();
    let e = net.add_module(LinearLayer::new(1), Some("e")).unwrap();
    net.add_connection(Connection::shared_full(mother, &a, &b).unwrap())
        .unwrap();
    let owned = net
        .add_connection(full_with(&b, &e, &[0., 0., 0.]))
        .unwrap();
    net.add_connection(Connection::shared_full(mother, &c, &d).unwrap())
        .unwrap();
    (net, owned)
}

#[test]
fn test_mother_counted_once() {
    let mother = MotherConnection::new(6, ParamInit::default(), Some("m"));
    let (net, _) = shared_network(&mother);

    assert_eq!(net.param_dim(), 9);
    assert_eq!(net.parameters().len(), 9);
    assert_eq!(net.derivatives().len(), 9);
}

#[test]
fn test_set_parameters_writes_mother() {
    let mother = MotherConnection::new(6, ParamInit::default(), None);
    let (mut net, owned) = shared_network(&mother);

    // 拼接顺序：母连接第一次出现的位置在前，自有连接在后
    let values = (0..9).map(|x| x as f32).collect::<Vec<_>>();
    net.set_parameters(&values).unwrap();
    assert_values(&mother.parameters(), &[0., 1., 2., 3., 4., 5.]);
    assert_values(&net.connection(owned).unwrap().parameters(), &[6., 7., 8.]);
    assert_values(&net.parameters(), &values);

    // 长度不符时不做任何修改
    assert_err!(net.set_parameters(&[1.; 8]), NetworkError::Dimension(9, 8));
    assert_values(&net.parameters(), &values);
}

#[test]
fn test_shared_gradients_through_network() {
    let mother = MotherConnection::new(6, ParamInit::default(), None);
    mother.set_parameters(&[1., 2., 3., 4., 5., 6.]).unwrap();
    let (mut net, _) = shared_network(&mother);

    // 输入按 a、c 拼接，输出按 b、d 拼接
    let output = net.activate(&[1., 0., 0., 1.]).unwrap();
    assert_values(&output, &[1., 3., 5., 2., 4., 6.]);

    let inerr = net.back_activate(&[1., 0., 0., 0., 0., 1.]).unwrap();
    assert_values(&inerr, &[1., 2., 5., 6.]);
    // 两个子连接的梯度都累加到母连接
    assert_values(&mother.derivatives(), &[1., 0., 0., 0., 0., 1.]);
    assert_values(
        &net.derivatives(),
        &[1., 0., 0., 0., 0., 1., 0., 0., 0.],
    );

    // 通过网络清零梯度会清零母连接
    net.reset_derivatives().unwrap();
    assert_values(&mother.derivatives(), &[0.; 6]);
}

#[test]
fn test_module_parameters_come_first() {
    let mut net = Network::new();
    let input = net.add_input_module(LinearLayer::new(1), None).unwrap();
    let output = net
        .add_output_module(BiasLayer::new(1, ParamInit::default()), None)
        .unwrap();
    net.add_connection(full_with(&input, &output, &[2.])).unwrap();

    net.set_parameters(&[0.5, 3.]).unwrap();
    assert_values(&net.parameters(), &[0.5, 3.]);
    // out = 3 * 1 + 0.5
    assert_values(&net.activate(&[1.]).unwrap(), &[3.5]);
}
