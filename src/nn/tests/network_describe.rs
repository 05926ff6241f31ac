use crate::nn::{
    Connection, ConnectionTag, LinearLayer, ModuleTag, MotherConnection, Network,
    NetworkDescriptor, ParamInit, SigmoidLayer,
};

fn small_network() -> Network {
    let mother = MotherConnection::new(2, ParamInit::default(), Some("tied"));
    let mut net = Network::with_name("describe_me");
    let input = net.add_input_module(LinearLayer::new(2), Some("in")).unwrap();
    let hidden = net.add_module(SigmoidLayer::new(1), Some("h")).unwrap();
    let output = net.add_output_module(LinearLayer::new(1), Some("out")).unwrap();
    net.add_connection(Connection::shared_full(&mother, &input, &hidden).unwrap())
        .unwrap();
    net.add_connection(Connection::full(&hidden, &output).unwrap())
        .unwrap();
    net.add_recurrent_connection(Connection::identity(&output, &hidden).unwrap())
        .unwrap();
    net
}

#[test]
fn test_describe_structure() {
    let mut net = small_network();
    let descriptor = net.describe();

    assert_eq!(descriptor.name, "describe_me");
    assert_eq!(descriptor.modules.len(), 3);
    assert_eq!(descriptor.connections.len(), 3);
    assert_eq!(descriptor.order, None);

    // 1. 模块按注册顺序
    let hidden = &descriptor.modules[1];
    assert_eq!(hidden.name, "h");
    assert_eq!(hidden.kind, "sigmoid");
    assert_eq!(hidden.tag, ModuleTag::Hidden);
    assert_eq!((hidden.indim, hidden.outdim, hidden.param_count), (1, 1, 0));

    // 2. 共享连接沿用母连接名称
    let shared = &descriptor.connections[0];
    assert!(shared.shared);
    assert_eq!(shared.name.as_deref(), Some("tied"));
    assert_eq!(shared.kind, "full");
    assert_eq!((shared.source, shared.dest), (0, 1));
    assert_eq!(shared.in_slice, (0, 2));

    let recurrent = &descriptor.connections[2];
    assert_eq!(recurrent.tag, ConnectionTag::Recurrent);
    assert_eq!(recurrent.kind, "identity");
    assert_eq!(recurrent.param_count, 0);
    assert_eq!(descriptor.total_params(), 3);

    // 3. 排序后带上拓扑序
    net.sort_modules().unwrap();
    assert_eq!(net.describe().order, Some(vec![0, 1, 2]));
}

#[test]
fn test_describe_json() {
    let mut net = small_network();
    net.sort_modules().unwrap();
    let descriptor = net.describe();

    let json = descriptor.to_json().unwrap();
    assert!(json.contains("\"name\": \"describe_me\""));
    assert!(json.contains("\"tag\": \"Recurrent\""));
    assert_eq!(NetworkDescriptor::from_json(&json).unwrap(), descriptor);

    // 未排序时不输出 order 字段，且匿名连接不输出 name 字段
    let unsorted = small_network().describe().to_json().unwrap();
    assert!(!unsorted.contains("\"order\""));
    assert_eq!(unsorted.matches("\"name\"").count(), 1 + 3 + 1);
}
