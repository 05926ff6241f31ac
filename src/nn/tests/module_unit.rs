use approx::assert_abs_diff_eq;
use ndarray::Array1;

use super::assert_values;
use crate::nn::{
    BiasLayer, BiasUnit, LinearLayer, ModuleType, ParamInit, SigmoidLayer, TanhLayer,
    TraitModule,
};

#[test]
fn test_module_kind_and_dims() {
    let modules: Vec<ModuleType> = vec![
        LinearLayer::new(3).into(),
        SigmoidLayer::new(2).into(),
        TanhLayer::new(4).into(),
        BiasUnit::new().into(),
        BiasLayer::new(5, ParamInit::default()).into(),
    ];
    let summary = modules
        .iter()
        .map(|m| (m.kind(), m.indim(), m.outdim()))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("linear", 3, 3),
            ("sigmoid", 2, 2),
            ("tanh", 4, 4),
            ("bias", 0, 1),
            ("bias_layer", 5, 5),
        ]
    );
    // 只有 BiasLayer 自带参数
    assert!(modules[0].params().is_none());
    assert_eq!(modules[4].params().unwrap().paramdim(), 5);
}

#[test]
fn test_sigmoid_layer() {
    let mut layer = SigmoidLayer::new(2);
    let input = Array1::from(vec![0.0, 2.0]);

    let output = layer.forward(&input);
    assert_abs_diff_eq!(output[0], 0.5);
    assert_abs_diff_eq!(output[1], 0.880_797, epsilon = 1e-5);

    // 导数 = y * (1 - y)
    let inerr = layer
        .backward(&Array1::from(vec![1.0, 1.0]), &input, &output)
        .unwrap();
    assert_values(&inerr, &[0.25, 0.880_797 * (1.0 - 0.880_797)]);
}

#[test]
fn test_tanh_layer() {
    let mut layer = TanhLayer::new(1);
    let input = Array1::from(vec![0.5]);

    let output = layer.forward(&input);
    assert_abs_diff_eq!(output[0], 0.5_f32.tanh());

    let inerr = layer
        .backward(&Array1::from(vec![2.0]), &input, &output)
        .unwrap();
    let y = 0.5_f32.tanh();
    assert_values(&inerr, &[2.0 * (1.0 - y * y)]);
}

#[test]
fn test_bias_modules() {
    // 1. 偏置单元恒输出 1，没有输入误差
    let mut unit = BiasUnit::new();
    let output = unit.forward(&Array1::zeros(0));
    assert_values(&output, &[1.0]);
    assert_eq!(
        unit.backward(&Array1::from(vec![3.0]), &Array1::zeros(0), &output)
            .unwrap()
            .len(),
        0
    );

    // 2. 偏置层：output = input + b，梯度累加到自身参数上
    let mut layer = BiasLayer::new(2, ParamInit::default());
    layer.params_mut().unwrap().set_parameters(&[1.0, -1.0]).unwrap();
    let input = Array1::from(vec![0.5, 0.5]);
    let output = layer.forward(&input);
    assert_values(&output, &[1.5, -0.5]);

    let outerr = Array1::from(vec![0.2, 0.4]);
    let inerr = layer.backward(&outerr, &input, &output).unwrap();
    assert_values(&inerr, &[0.2, 0.4]);
    layer.backward(&outerr, &input, &output).unwrap();
    assert_values(layer.params().unwrap().derivatives(), &[0.4, 0.8]);
}
