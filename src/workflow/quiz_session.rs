//! 测验会话 - 流程层
//!
//! 核心职责：管理"一次答题"的完整流程
//!
//! 状态流转：
//! 1. InProgress：随时修改任意题目的作答
//! 2. submit → Submitted：答案冻结，逐题校验并算分，回调宿主
//! 3. retry_failed_only → InProgress（全部重置）或 Retrying（只开放答错的题目）

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{DefinitionError, InputRejected};
use crate::models::answer::{correct_answer, AnswerRecord, CandidateAnswer};
use crate::models::question::{Question, Quiz};
use crate::models::score::{QuestionOutcome, ScoreResult};
use crate::services::{keep_order, randomize, validate, DisplayPermutation, MatchBoard, RandomizedQuestion};
use crate::workflow::completion::{
    CompletionCallback, CompletionDetails, RetryAction, RetryHandler,
};

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 作答中
    InProgress,
    /// 重做中，只有 `failed` 中的题目可以修改
    Retrying { failed: Vec<usize> },
    /// 已提交
    Submitted,
}

/// 加载测验并创建会话（选项随机打乱）
pub fn load_quiz(quiz: Quiz) -> Result<QuizSession, DefinitionError> {
    QuizSession::builder(quiz).build()
}

/// 会话构建器
pub struct QuizSessionBuilder {
    quiz: Quiz,
    randomize: bool,
    seed: Option<u64>,
    on_complete: Option<CompletionCallback>,
    retry_handler: Option<Box<dyn RetryHandler>>,
}

impl QuizSessionBuilder {
    /// 是否打乱选择题选项（默认打乱）
    pub fn randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// 固定随机种子
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(bool, &CompletionDetails) + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn retry_handler<H>(mut self, handler: H) -> Self
    where
        H: RetryHandler + 'static,
    {
        self.retry_handler = Some(Box::new(handler));
        self
    }

    /// 校验测验并创建会话
    pub fn build(self) -> Result<QuizSession, DefinitionError> {
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.build_with_rng(&mut rng)
            }
            None => {
                let mut rng = rand::thread_rng();
                self.build_with_rng(&mut rng)
            }
        }
    }

    /// 使用指定的随机数生成器创建会话
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<QuizSession, DefinitionError> {
        self.quiz.validate()?;

        let Quiz {
            title,
            description,
            questions,
        } = self.quiz;

        let questions: Vec<RandomizedQuestion> = questions
            .iter()
            .map(|q| {
                if self.randomize {
                    randomize(q, rng)
                } else {
                    keep_order(q)
                }
            })
            .collect();

        let boards = questions
            .iter()
            .enumerate()
            .filter_map(|(index, rq)| match &rq.question {
                Question::Match(q) => Some((index, MatchBoard::for_question(q))),
                _ => None,
            })
            .collect();

        info!(
            "[测验 {}] 📋 会话已创建: {} 道题, 选项打乱: {}",
            title,
            questions.len(),
            self.randomize
        );

        Ok(QuizSession {
            title,
            description,
            questions,
            answers: AnswerRecord::new(),
            boards,
            state: SessionState::InProgress,
            show_answers: false,
            last_result: None,
            attempt: 1,
            on_complete: self.on_complete,
            retry_handler: self.retry_handler,
        })
    }
}

/// 测验会话
///
/// - 持有打乱后的题目视图和排列，整个会话期间不变
/// - 作答按展示顺序记录
/// - 不做持久化，结果通过回调交给宿主
pub struct QuizSession {
    title: String,
    description: Option<String>,
    questions: Vec<RandomizedQuestion>,
    answers: AnswerRecord,
    boards: BTreeMap<usize, MatchBoard>,
    state: SessionState,
    show_answers: bool,
    last_result: Option<ScoreResult>,
    attempt: u32,
    on_complete: Option<CompletionCallback>,
    retry_handler: Option<Box<dyn RetryHandler>>,
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("title", &self.title)
            .field("questions", &self.questions.len())
            .field("answers", &self.answers)
            .field("state", &self.state)
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

impl QuizSession {
    pub fn builder(quiz: Quiz) -> QuizSessionBuilder {
        QuizSessionBuilder {
            quiz,
            randomize: true,
            seed: None,
            on_complete: None,
            retry_handler: None,
        }
    }

    // ========== 只读访问 ==========

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 展示用的题目（选项已打乱）
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index).map(|rq| &rq.question)
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().map(|rq| &rq.question)
    }

    /// 选择题的展示排列
    pub fn permutation(&self, index: usize) -> Option<&DisplayPermutation> {
        self.questions.get(index)?.permutation.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&CandidateAnswer> {
        self.answers.get(&index)
    }

    /// 作答映射回原始选项顺序
    pub fn original_answers(&self) -> AnswerRecord {
        self.answers
            .iter()
            .map(|(&index, answer)| {
                let mapped = match self.permutation(index) {
                    Some(permutation) => permutation.answer_to_original(answer),
                    None => answer.clone(),
                };
                (index, mapped)
            })
            .collect()
    }

    pub fn result(&self) -> Option<&ScoreResult> {
        self.last_result.as_ref()
    }

    pub fn match_board(&self, index: usize) -> Option<&MatchBoard> {
        self.boards.get(&index)
    }

    // ========== 作答 ==========

    /// 设置某题的作答（选项索引为展示顺序）
    ///
    /// 空作答等同于清除该题作答
    pub fn set_answer(&mut self, index: usize, answer: CandidateAnswer) -> Result<(), InputRejected> {
        let (kind, option_len, sides) = {
            let question = self.editable_question(index)?;
            let option_len = match question {
                Question::Mcq(q) | Question::Msq(q) => Some(q.options.len()),
                _ => None,
            };
            let sides = match question {
                Question::Match(q) => Some((q.left.len(), q.right.len())),
                _ => None,
            };
            (question.kind(), option_len, sides)
        };
        if !answer.fits(kind) {
            return Err(InputRejected::KindMismatch {
                question: index,
                kind: kind.as_str(),
            });
        }

        if let (Some(len), CandidateAnswer::Choices(chosen)) = (option_len, &answer) {
            if let Some(&bad) = chosen.iter().find(|&&i| i >= len) {
                return Err(InputRejected::OptionOutOfRange {
                    question: index,
                    index: bad,
                });
            }
        }

        if let Some((left_len, right_len)) = sides {
            let pairs: Vec<(usize, usize)> = match &answer {
                CandidateAnswer::Pairs(pairs) => pairs.iter().copied().collect(),
                _ => Vec::new(),
            };
            let board = MatchBoard::from_pairs(left_len, right_len, pairs)?;
            self.boards.insert(index, board);
            self.sync_match_answer(index);
            debug!("[测验 {}] 题目 {} 连线作答已更新", self.title, index);
            return Ok(());
        }

        if answer.is_empty() {
            self.answers.remove(&index);
        } else {
            self.answers.insert(index, answer);
        }
        debug!("[测验 {}] 题目 {} 已作答", self.title, index);
        Ok(())
    }

    /// 设置某题的作答（选项索引为测验定义中的原始顺序）
    pub fn set_answer_original(&mut self, index: usize, answer: CandidateAnswer) -> Result<(), InputRejected> {
        let mapped = match self.permutation(index) {
            Some(permutation) => permutation.answer_to_display(&answer),
            None => answer,
        };
        self.set_answer(index, mapped)
    }

    pub fn clear_answer(&mut self, index: usize) -> Result<(), InputRejected> {
        self.editable_question(index)?;
        self.answers.remove(&index);
        if let Some(board) = self.boards.get_mut(&index) {
            board.clear();
        }
        Ok(())
    }

    // ========== 连线题 ==========

    pub fn add_pair(&mut self, index: usize, left: usize, right: usize) -> Result<(), InputRejected> {
        self.board_mut(index)?.add_pair(left, right)?;
        self.sync_match_answer(index);
        Ok(())
    }

    pub fn remove_pair(&mut self, index: usize, position: usize) -> Result<(usize, usize), InputRejected> {
        let removed = self.board_mut(index)?.remove_pair(position)?;
        self.sync_match_answer(index);
        Ok(removed)
    }

    pub fn begin_drag(&mut self, index: usize, left: usize) -> Result<(), InputRejected> {
        self.board_mut(index)?.begin_drag(left)
    }

    pub fn drop_on(&mut self, index: usize, right: usize) -> Result<(), InputRejected> {
        self.board_mut(index)?.drop_on(right)?;
        self.sync_match_answer(index);
        Ok(())
    }

    pub fn cancel_drag(&mut self, index: usize) -> Result<(), InputRejected> {
        self.board_mut(index)?.cancel_drag();
        Ok(())
    }

    // ========== 提交 ==========

    /// 该题是否已作答（连线题需全部连完）
    pub fn is_answered(&self, index: usize) -> bool {
        match self.boards.get(&index) {
            Some(board) => board.is_fully_matched(),
            None => self
                .answers
                .get(&index)
                .map(|a| !a.is_empty())
                .unwrap_or(false),
        }
    }

    /// 尚未作答的题目
    pub fn missing_answers(&self) -> Vec<usize> {
        (0..self.questions.len())
            .filter(|&i| !self.is_answered(i))
            .collect()
    }

    pub fn all_answered(&self) -> bool {
        (0..self.questions.len()).all(|i| self.is_answered(i))
    }

    /// 是否可以提交
    pub fn can_submit(&self) -> bool {
        !matches!(self.state, SessionState::Submitted) && self.all_answered()
    }

    /// 提交并算分
    ///
    /// 每次成功提交都会调用一次完成回调
    pub fn submit(&mut self) -> Result<ScoreResult, InputRejected> {
        if matches!(self.state, SessionState::Submitted) {
            return Err(InputRejected::Frozen);
        }
        let missing = self.missing_answers();
        if !missing.is_empty() {
            return Err(InputRejected::Incomplete { missing });
        }

        let outcomes = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, rq)| {
                let candidate = self.answers.get(&index);
                QuestionOutcome {
                    question_index: index,
                    correct: validate(&rq.question, candidate),
                    candidate_answer: candidate.cloned(),
                    correct_answer: correct_answer(&rq.question),
                }
            })
            .collect();
        let result = ScoreResult::from_outcomes(outcomes);
        let passed = result.passed();

        self.state = SessionState::Submitted;
        self.show_answers = false;
        self.last_result = Some(result.clone());

        if passed {
            info!("[测验 {}] ✅ 第 {} 次提交: {} 通过", self.title, self.attempt, result);
        } else {
            info!(
                "[测验 {}] ❌ 第 {} 次提交: {} 未通过, 答错: {:?}",
                self.title,
                self.attempt,
                result,
                result.failed_indices()
            );
        }

        let details = CompletionDetails {
            score: result.clone(),
            answers: self.answers.clone(),
            original_answers: self.original_answers(),
            attempt: self.attempt,
        };
        if let Some(callback) = self.on_complete.as_mut() {
            callback(passed, &details);
        }

        Ok(result)
    }

    // ========== 提交后 ==========

    /// 切换是否显示正确答案（只影响展示，不影响得分）
    pub fn toggle_show_answers(&mut self) -> Result<bool, InputRejected> {
        if !matches!(self.state, SessionState::Submitted) {
            return Err(InputRejected::NotSubmitted);
        }
        self.show_answers = !self.show_answers;
        Ok(self.show_answers)
    }

    pub fn showing_answers(&self) -> bool {
        self.show_answers
    }

    /// 显示答案时返回该题的正确答案（展示顺序）
    pub fn revealed_answer(&self, index: usize) -> Option<CandidateAnswer> {
        if !self.show_answers || !matches!(self.state, SessionState::Submitted) {
            return None;
        }
        self.question(index).map(correct_answer)
    }

    /// 重做答错的题目
    ///
    /// 有注入的重做处理器时由它决定方式，否则清空全部作答重新开始
    pub fn retry_failed_only(&mut self) -> Result<RetryAction, InputRejected> {
        let result = match (&self.state, &self.last_result) {
            (SessionState::Submitted, Some(result)) => result.clone(),
            _ => return Err(InputRejected::NotSubmitted),
        };
        if result.passed() {
            return Err(InputRejected::NothingToRetry);
        }

        let action = match self.retry_handler.as_mut() {
            Some(handler) => handler.on_retry(&result, &self.answers),
            None => RetryAction::default(),
        };

        match action {
            RetryAction::ResetAll => {
                self.answers.clear();
                for board in self.boards.values_mut() {
                    board.clear();
                }
                self.state = SessionState::InProgress;
            }
            RetryAction::RetryFailedOnly => {
                let failed = result.failed_indices();
                for index in &failed {
                    self.answers.remove(index);
                    if let Some(board) = self.boards.get_mut(index) {
                        board.clear();
                    }
                }
                self.state = SessionState::Retrying { failed };
            }
            RetryAction::Handled => {
                info!("[测验 {}] 重做已交给宿主处理", self.title);
                return Ok(action);
            }
        }

        self.show_answers = false;
        self.attempt += 1;
        info!(
            "[测验 {}] 🔁 开始第 {} 次作答 ({:?})",
            self.title, self.attempt, action
        );
        Ok(action)
    }

    // ========== 内部方法 ==========

    /// 检查题目存在且当前可修改
    fn editable_question(&self, index: usize) -> Result<&Question, InputRejected> {
        let question = self
            .question(index)
            .ok_or(InputRejected::UnknownQuestion { question: index })?;
        match &self.state {
            SessionState::Submitted => Err(InputRejected::Frozen),
            SessionState::Retrying { failed } if !failed.contains(&index) => {
                Err(InputRejected::QuestionLocked { question: index })
            }
            _ => Ok(question),
        }
    }

    fn board_mut(&mut self, index: usize) -> Result<&mut MatchBoard, InputRejected> {
        let kind = self.editable_question(index)?.kind();
        self.boards
            .get_mut(&index)
            .ok_or(InputRejected::KindMismatch {
                question: index,
                kind: kind.as_str(),
            })
    }

    /// 连线题的作答始终由配对面板派生
    fn sync_match_answer(&mut self, index: usize) {
        if let Some(board) = self.boards.get(&index) {
            if board.pairs().is_empty() {
                self.answers.remove(&index);
            } else {
                self.answers.insert(index, board.to_answer());
            }
        }
    }
}
