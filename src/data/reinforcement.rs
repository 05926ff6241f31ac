/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 强化学习数据集：按序列组织的 (state, action, reward) 样本
 */

use super::DataError;
use ndarray::{Array2, Axis};
use std::ops::Range;

/// 一个按行追加、定宽的字段
#[derive(Debug, Clone)]
struct Field {
    width: usize,
    data: Vec<f32>,
}

impl Field {
    const fn new(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    fn rows(&self, range: Range<usize>) -> Array2<f32> {
        let data = self.data[range.start * self.width..range.end * self.width].to_vec();
        // 长度恒为 行数 × width
        Array2::from_shape_vec((range.len(), self.width), data)
            .unwrap_or_else(|_| Array2::zeros((0, self.width)))
    }
}

/// 强化学习数据集
///
/// - `state`、`action`、`reward` 三个字段相互关联：每个样本同时追加到三者，行数始终一致；
/// - `sequence_index` 记录每个序列（episode）的起始行，初始为`[0]`，
///   因此空数据集也视为含有 1 个空序列。
#[derive(Debug, Clone)]
pub struct ReinforcementDataSet {
    state: Field,
    action: Field,
    reward: Field,
    sequence_index: Vec<usize>,
}

impl ReinforcementDataSet {
    pub fn new(statedim: usize, actiondim: usize) -> Self {
        Self {
            state: Field::new(statedim),
            action: Field::new(actiondim),
            reward: Field::new(1),
            sequence_index: vec![0],
        }
    }

    pub const fn statedim(&self) -> usize {
        self.state.width
    }

    pub const fn actiondim(&self) -> usize {
        self.action.width
    }

    /// 样本（行）数
    pub fn len(&self) -> usize {
        self.reward.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 追加一个样本；任一宽度不符时三个字段都不会被修改
    pub fn add_sample(
        &mut self,
        state: &[f32],
        action: &[f32],
        reward: f32,
    ) -> Result<(), DataError> {
        Self::check_width("state", self.state.width, state.len())?;
        Self::check_width("action", self.action.width, action.len())?;

        self.state.data.extend_from_slice(state);
        self.action.data.extend_from_slice(action);
        self.reward.data.push(reward);
        Ok(())
    }

    /// 从下一个样本起开始新序列；当前序列仍为空时不做任何事
    pub fn new_sequence(&mut self) {
        let len = self.len();
        if self.sequence_index.last() != Some(&len) {
            self.sequence_index.push(len);
        }
    }

    pub fn num_sequences(&self) -> usize {
        self.sequence_index.len()
    }

    /// 第`n`个序列所占的行区间
    pub fn sequence_bounds(&self, n: usize) -> Result<Range<usize>, DataError> {
        let start = *self
            .sequence_index
            .get(n)
            .ok_or(DataError::IndexOutOfBounds {
                index: n,
                len: self.num_sequences(),
            })?;
        let end = self
            .sequence_index
            .get(n + 1)
            .copied()
            .unwrap_or_else(|| self.len());
        Ok(start..end)
    }

    pub fn dimension(&self, field: &str) -> Result<usize, DataError> {
        match field {
            "sequence_index" => Ok(1),
            _ => Ok(self.linked_field(field)?.width),
        }
    }

    /// 字段的全部行，形状 [行数, 宽度]
    pub fn field(&self, field: &str) -> Result<Array2<f32>, DataError> {
        if field == "sequence_index" {
            let data = self.sequence_index.iter().map(|&i| i as f32).collect();
            return Ok(Array2::from_shape_vec((self.num_sequences(), 1), data)
                .unwrap_or_else(|_| Array2::zeros((0, 1))));
        }
        Ok(self.linked_field(field)?.rows(0..self.len()))
    }

    /// 第`n`个序列中某字段的行
    pub fn sequence_field(&self, n: usize, field: &str) -> Result<Array2<f32>, DataError> {
        let bounds = self.sequence_bounds(n)?;
        Ok(self.linked_field(field)?.rows(bounds))
    }

    /// 每个序列一行：该序列内某字段各行的逐元素和，形状 [序列数, 字段宽度]
    ///
    /// 空序列对应全零行。
    pub fn sum_over_sequences(&self, field: &str) -> Result<Array2<f32>, DataError> {
        let width = self.linked_field(field)?.width;
        let mut sums = Array2::zeros((self.num_sequences(), width));
        for n in 0..self.num_sequences() {
            let rows = self.sequence_field(n, field)?;
            sums.row_mut(n).assign(&rows.sum_axis(Axis(0)));
        }
        Ok(sums)
    }

    /// 清空所有样本，序列标记回到`[0]`
    pub fn clear(&mut self) {
        self.state.data.clear();
        self.action.data.clear();
        self.reward.data.clear();
        self.sequence_index = vec![0];
    }

    fn linked_field(&self, field: &str) -> Result<&Field, DataError> {
        match field {
            "state" => Ok(&self.state),
            "action" => Ok(&self.action),
            "reward" => Ok(&self.reward),
            _ => Err(DataError::UnknownField(field.to_string())),
        }
    }

    fn check_width(field: &str, expected: usize, got: usize) -> Result<(), DataError> {
        if expected != got {
            return Err(DataError::ShapeMismatch {
                field: field.to_string(),
                expected,
                got,
            });
        }
        Ok(())
    }
}
