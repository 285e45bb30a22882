//! 连线题配对状态 - 业务能力层
//!
//! 用户通过添加/删除配对逐步完成连线。任何时刻左右两侧的每一项
//! 最多出现在一个配对中

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::InputRejected;
use crate::models::answer::CandidateAnswer;
use crate::models::question::MatchQuestion;

/// 连线题的配对面板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBoard {
    left_len: usize,
    right_len: usize,
    /// 按添加顺序排列的配对
    pairs: Vec<(usize, usize)>,
    /// 正在拖动的左侧条目
    dragging: Option<usize>,
}

impl MatchBoard {
    pub fn new(left_len: usize, right_len: usize) -> Self {
        Self {
            left_len,
            right_len,
            pairs: Vec::new(),
            dragging: None,
        }
    }

    pub fn for_question(question: &MatchQuestion) -> Self {
        Self::new(question.left.len(), question.right.len())
    }

    /// 用已有配对恢复面板，逐个添加，遇到非法配对即返回错误
    pub fn from_pairs(
        left_len: usize,
        right_len: usize,
        pairs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, InputRejected> {
        let mut board = Self::new(left_len, right_len);
        for (left, right) in pairs {
            board.add_pair(left, right)?;
        }
        Ok(board)
    }

    /// 添加配对
    ///
    /// 左侧或右侧条目已被使用、或索引越界时拒绝，面板保持不变
    pub fn add_pair(&mut self, left: usize, right: usize) -> Result<(), InputRejected> {
        if left >= self.left_len || right >= self.right_len {
            return Err(InputRejected::PairOutOfRange { left, right });
        }
        if self.pairs.iter().any(|&(l, _)| l == left) {
            return Err(InputRejected::LeftAlreadyPaired { left });
        }
        if self.pairs.iter().any(|&(_, r)| r == right) {
            return Err(InputRejected::RightAlreadyPaired { right });
        }
        self.pairs.push((left, right));
        debug!("添加配对 ({}, {})，当前 {} 对", left, right, self.pairs.len());
        Ok(())
    }

    /// 删除指定位置的配对，两侧条目回到未配对状态
    pub fn remove_pair(&mut self, position: usize) -> Result<(usize, usize), InputRejected> {
        if position >= self.pairs.len() {
            return Err(InputRejected::UnknownPair { position });
        }
        let removed = self.pairs.remove(position);
        debug!("删除配对 {:?}", removed);
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.dragging = None;
    }

    // ========== 拖放事件 ==========

    /// 开始拖动左侧条目（已配对的条目不能拖动）
    pub fn begin_drag(&mut self, left: usize) -> Result<(), InputRejected> {
        if left >= self.left_len {
            return Err(InputRejected::PairOutOfRange { left, right: 0 });
        }
        if self.pairs.iter().any(|&(l, _)| l == left) {
            return Err(InputRejected::LeftAlreadyPaired { left });
        }
        self.dragging = Some(left);
        Ok(())
    }

    /// 放到右侧条目上，成功则生成配对
    ///
    /// 放置被拒绝时拖动状态保留，用户可以换一个目标
    pub fn drop_on(&mut self, right: usize) -> Result<(), InputRejected> {
        let left = self.dragging.ok_or(InputRejected::NoDragInProgress)?;
        self.add_pair(left, right)?;
        self.dragging = None;
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    // ========== 派生状态 ==========

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn unmatched_left(&self) -> Vec<usize> {
        (0..self.left_len)
            .filter(|i| !self.pairs.iter().any(|&(l, _)| l == *i))
            .collect()
    }

    pub fn unmatched_right(&self) -> Vec<usize> {
        (0..self.right_len)
            .filter(|i| !self.pairs.iter().any(|&(_, r)| r == *i))
            .collect()
    }

    /// 所有左侧条目都已配对
    pub fn is_fully_matched(&self) -> bool {
        self.pairs.len() == self.left_len
    }

    /// 作为作答（无序配对集合）
    pub fn to_answer(&self) -> CandidateAnswer {
        CandidateAnswer::Pairs(self.pairs.iter().copied().collect::<BTreeSet<_>>())
    }
}
