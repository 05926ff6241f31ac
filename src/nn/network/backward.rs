/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : Network 反向传播
 */

use super::types::ModuleSlot;
use super::{ConnectionTag, ModuleId, Network};
use crate::nn::{NetworkError, TraitModule};
use ndarray::{Array1, s};

impl Network {
    /// 设置下一次反向时输出模块的外部误差（按输出模块注册顺序拼接）
    pub fn set_output_error(&mut self, outerr: &[f32]) -> Result<(), NetworkError> {
        let outdim = self.outdim();
        if outerr.len() != outdim {
            return Err(NetworkError::Dimension {
                expected: outdim,
                got: outerr.len(),
                message: format!("网络{}的输出误差长度须等于所有输出模块的输出宽度之和", self.name),
            });
        }
        self.pending_outerr = Some(Array1::from(outerr.to_vec()));
        Ok(())
    }

    /// 反向传播最近一个尚未反向的时间步
    ///
    /// 按拓扑逆序处理每个模块：其输出误差 = 外部误差 + 各出边的反向贡献
    /// （普通出边取目标模块本步的输入误差，循环出边取目标模块下一步的输入误差），
    /// 出边在反向时把参数梯度累加进各自（或母连接）的梯度缓冲；随后由模块求出输入误差。
    pub fn backward(&mut self) -> Result<(), NetworkError> {
        self.ensure_sorted()?;
        if let Err(e) = self.ensure_backward_pending() {
            // 失败的反向不保留已写入的外部误差
            self.pending_outerr = None;
            return Err(e);
        }
        self.offset -= 1;
        let t = self.offset;

        for module in &mut self.modules {
            let step = &mut module.steps[t];
            step.external_err.fill(0.);
            step.outerr.fill(0.);
            step.inerr.fill(0.);
        }
        if let Some(outerr) = self.pending_outerr.take() {
            self.scatter_external_error(t, &outerr);
        }

        let order = self.cached_order().to_vec();
        for id in order.into_iter().rev() {
            self.backward_module(id, t)?;
        }
        log::trace!("网络{}完成第{t}步反向", self.name);
        Ok(())
    }

    fn ensure_backward_pending(&self) -> Result<(), NetworkError> {
        if self.offset == 0 {
            return Err(NetworkError::InvalidOperation(format!(
                "网络{}没有待反向传播的时间步，请先执行 forward",
                self.name
            )));
        }
        Ok(())
    }

    fn backward_module(&mut self, id: ModuleId, t: usize) -> Result<(), NetworkError> {
        let mut outerr = self.modules[id.0].steps[t].external_err.clone();
        for slot in &mut self.connections {
            let connection = &mut slot.connection;
            if connection.source() != id {
                continue;
            }
            let dest_step = match slot.tag {
                ConnectionTag::Normal => t,
                ConnectionTag::Recurrent => t + 1,
            };
            // 最后一步的循环出边没有下一步可接收误差
            let Some(dest) = self.modules[connection.dest().0].steps.get(dest_step) else {
                continue;
            };
            let dest_err = connection.slice_dest(&dest.inerr);
            let input = connection.slice_source(&self.modules[id.0].steps[t].output);
            let contribution = connection.backward(&dest_err, &input)?;
            connection.add_to_source(&contribution, &mut outerr);
        }

        let ModuleSlot { unit, steps, .. } = &mut self.modules[id.0];
        let inerr = unit.backward(&outerr, &steps[t].input, &steps[t].output)?;
        steps[t].outerr = outerr;
        steps[t].inerr = inerr;
        Ok(())
    }

    fn scatter_external_error(&mut self, t: usize, outerr: &Array1<f32>) {
        let mut start = 0;
        for id in self.output_modules() {
            let step = &mut self.modules[id.0].steps[t];
            let width = step.external_err.len();
            step.external_err.assign(&outerr.slice(s![start..start + width]));
            start += width;
        }
    }

    /// 所有输入模块在最近一次反向时间步上的输入误差（按输入模块注册顺序拼接）
    pub fn input_error(&self) -> Result<Array1<f32>, NetworkError> {
        let mut values = Vec::with_capacity(self.indim());
        for id in self.input_modules() {
            let step = self.modules[id.0].steps.get(self.offset).ok_or_else(|| {
                NetworkError::InvalidOperation(format!("网络{}尚未执行 backward", self.name))
            })?;
            values.extend(step.inerr.iter().copied());
        }
        Ok(Array1::from(values))
    }

    /// 写入输出误差、反向一步并返回输入误差
    pub fn back_activate(&mut self, outerr: &[f32]) -> Result<Array1<f32>, NetworkError> {
        self.ensure_backward_pending()?;
        self.set_output_error(outerr)?;
        self.backward()?;
        self.input_error()
    }
}
