/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network 前向传播
 */

use super::types::StepBuffers;
use super::{ConnectionTag, ModuleId, Network};
use crate::nn::{NetworkError, TraitModule};
use ndarray::{Array1, s};

impl Network {
    /// 设置下一次前向时输入模块的外部输入（按输入模块注册顺序拼接）
    pub fn set_input(&mut self, input: &[f32]) -> Result<(), NetworkError> {
        let indim = self.indim();
        if input.len() != indim {
            return Err(NetworkError::Dimension {
                expected: indim,
                got: input.len(),
                message: format!("网络{}的输入长度须等于所有输入模块的输入宽度之和", self.name),
            });
        }
        self.pending_input = Some(Array1::from(input.to_vec()));
        Ok(())
    }

    /// 前向传播一个时间步
    ///
    /// 按缓存的拓扑序（失效时先重新排序）逐模块计算：
    /// 输入 = 外部输入 + 各普通入边对本步源输出的变换 + 各循环入边对上一步源输出的变换。
    /// 没有入边的模块得到零输入（输入模块则为外部输入）。
    pub fn forward(&mut self) -> Result<(), NetworkError> {
        self.ensure_sorted()?;
        if !self.is_recurrent() {
            self.offset = 0;
        }
        let t = self.offset;
        // 外部误差只属于写入时已有的时间步
        self.pending_outerr = None;

        // 第 t 步及之后的旧缓冲区作废
        for module in &mut self.modules {
            module.steps.truncate(t);
            module
                .steps
                .push(StepBuffers::zeros(module.unit.indim(), module.unit.outdim()));
        }
        if let Some(input) = self.pending_input.take() {
            self.scatter_external_input(t, &input);
        }

        let order = self.cached_order().to_vec();
        for id in order {
            self.forward_module(id, t)?;
        }
        self.offset = t + 1;
        log::trace!("网络{}完成第{t}步前向", self.name);
        Ok(())
    }

    fn forward_module(&mut self, id: ModuleId, t: usize) -> Result<(), NetworkError> {
        let mut input = self.modules[id.0].steps[t].external.clone();
        for slot in &self.connections {
            let connection = &slot.connection;
            if connection.dest() != id {
                continue;
            }
            let source_step = match slot.tag {
                ConnectionTag::Normal => t,
                // 第 0 步没有上一步，循环连接不贡献
                ConnectionTag::Recurrent => match t.checked_sub(1) {
                    Some(prev) => prev,
                    None => continue,
                },
            };
            let source_output = &self.modules[connection.source().0].steps[source_step].output;
            let contribution = connection.forward(&connection.slice_source(source_output))?;
            connection.add_to_dest(&contribution, &mut input);
        }

        let module = &mut self.modules[id.0];
        let output = module.unit.forward(&input);
        let step = &mut module.steps[t];
        step.input = input;
        step.output = output;
        Ok(())
    }

    fn scatter_external_input(&mut self, t: usize, input: &Array1<f32>) {
        let mut start = 0;
        for id in self.input_modules() {
            let step = &mut self.modules[id.0].steps[t];
            let width = step.external.len();
            step.external.assign(&input.slice(s![start..start + width]));
            start += width;
        }
    }

    /// 所有输出模块最近一次前向的输出（按输出模块注册顺序拼接）
    pub fn output(&self) -> Result<Array1<f32>, NetworkError> {
        let mut values = Vec::with_capacity(self.outdim());
        for id in self.output_modules() {
            let step = self.modules[id.0].steps.last().ok_or_else(|| {
                NetworkError::InvalidOperation(format!("网络{}尚未执行 forward", self.name))
            })?;
            values.extend(step.output.iter().copied());
        }
        Ok(Array1::from(values))
    }

    /// 写入输入、前向一步并返回输出
    pub fn activate(&mut self, input: &[f32]) -> Result<Array1<f32>, NetworkError> {
        self.set_input(input)?;
        self.forward()?;
        self.output()
    }
}
