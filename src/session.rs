//! Calculator session state shared by every front end.
//!
//! Front ends translate key presses and button clicks into [`Command`]s and
//! render [`Session::main_display`], [`Session::sub_display`] and
//! [`Session::history`].

use crate::calc_engine::{eval_str, format_result, CalcError};
use tracing::debug;

/// One user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Append(char),
    Clear,
    Backspace,
    Evaluate,
    Answer,
    ToggleSign,
    Percent,
}

impl Command {
    /// Keyboard mapping shared by the front ends. Typing `%` appends the
    /// operator; the percent transform is bound to the keypad button.
    pub fn from_char(c: char) -> Option<Command> {
        match c {
            '=' | '\n' | '\r' => Some(Command::Evaluate),
            'a' | 'A' => Some(Command::Answer),
            'n' | 'N' => Some(Command::ToggleSign),
            'c' | 'C' => Some(Command::Clear),
            'x' | 'X' => Some(Command::Append('*')),
            c if is_input_char(c) || c == '×' || c == '÷' => Some(Command::Append(c)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Expression as evaluated, in internal form.
    pub expression: String,
    pub value: f64,
}

impl HistoryEntry {
    pub fn display(&self) -> String {
        format!("{} = {}", display_expr(&self.expression), format_result(self.value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Evaluated { expression: String },
    Failed(CalcError),
}

#[derive(Debug)]
pub struct Session {
    expression: String,
    last_answer: Option<f64>,
    history: Vec<HistoryEntry>,
    status: Status,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            expression: String::new(),
            last_answer: None,
            history: Vec::new(),
            status: Status::Idle,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn last_answer(&self) -> Option<f64> {
        self.last_answer
    }

    /// Evaluated expressions, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Append(c) => {
                self.append(c);
            }
            Command::Clear => self.clear(),
            Command::Backspace => self.backspace(),
            Command::Evaluate => {
                self.evaluate();
            }
            Command::Answer => self.insert_answer(),
            Command::ToggleSign => self.toggle_sign(),
            Command::Percent => self.percent(),
        }
    }

    /// Appends one input character. Display glyphs are normalized; anything
    /// that is not part of the grammar is ignored and `false` returned.
    pub fn append(&mut self, c: char) -> bool {
        let c = match c {
            '×' => '*',
            '÷' => '/',
            c => c,
        };
        if !is_input_char(c) {
            return false;
        }
        if c.is_ascii_digit() || c == '.' || c == '(' {
            self.start_operand();
        }
        self.expression.push(c);
        self.status = Status::Idle;
        true
    }

    pub fn clear(&mut self) {
        self.expression.clear();
        self.status = Status::Idle;
    }

    pub fn backspace(&mut self) {
        self.expression.pop();
        self.status = Status::Idle;
    }

    pub fn insert_answer(&mut self) {
        if let Some(answer) = self.last_answer {
            self.start_operand();
            self.expression.push_str(&format_result(answer));
        }
        self.status = Status::Idle;
    }

    /// Flips the sign of the trailing number: `5` becomes `-5`, `3*-5`
    /// becomes `3*5`.
    pub fn toggle_sign(&mut self) {
        if let Some(number) = trailing_number(&self.expression) {
            if number.negative {
                self.expression.remove(number.start);
            } else {
                self.expression.insert(number.start, '-');
            }
        }
        self.status = Status::Idle;
    }

    /// Replaces the trailing number with its hundredth. A number too large
    /// to represent is left in place and reported as an overflow.
    pub fn percent(&mut self) {
        self.status = Status::Idle;
        if let Some(number) = trailing_number(&self.expression) {
            if let Ok(value) = self.expression[number.start..].parse::<f64>() {
                let scaled = value / 100.0;
                if !scaled.is_finite() {
                    self.status = Status::Failed(CalcError::Overflow);
                    return;
                }
                self.expression.replace_range(number.start.., &format_result(scaled));
            }
        }
    }

    /// Evaluates the expression. On success the expression is replaced by
    /// the formatted result and the pair is recorded in the history; on
    /// failure the expression is kept and the status carries the error.
    pub fn evaluate(&mut self) -> Option<Result<f64, CalcError>> {
        if self.expression.trim().is_empty() {
            self.status = Status::Idle;
            return None;
        }

        let result = eval_str(&self.expression);
        match &result {
            Ok(value) => {
                debug!(expression = %self.expression, value, "evaluated");
                let expression = std::mem::take(&mut self.expression);
                self.last_answer = Some(*value);
                self.history.push(HistoryEntry {
                    expression: expression.clone(),
                    value: *value,
                });
                self.expression = format_result(*value);
                self.status = Status::Evaluated { expression };
            }
            Err(err) => {
                debug!(expression = %self.expression, error = %err, "evaluation failed");
                self.status = Status::Failed(err.clone());
            }
        }
        Some(result)
    }

    pub fn main_display(&self) -> String {
        match self.status {
            Status::Failed(_) => "Error".to_string(),
            _ if self.expression.is_empty() => "0".to_string(),
            _ => display_expr(&self.expression),
        }
    }

    pub fn sub_display(&self) -> String {
        match &self.status {
            Status::Idle => String::new(),
            Status::Evaluated { expression } => format!("{} =", display_expr(expression)),
            Status::Failed(err) => format!("Error: {}", err),
        }
    }

    /// A new operand right after a successful evaluation starts a fresh
    /// expression instead of extending the result.
    fn start_operand(&mut self) {
        if matches!(self.status, Status::Evaluated { .. }) {
            self.expression.clear();
        }
    }
}

fn is_input_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')')
}

/// Converts internal operators to display glyphs.
pub fn display_expr(expression: &str) -> String {
    expression.replace('*', "×").replace('/', "÷")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrailingNumber {
    /// Byte offset of the number, including its sign when it has one.
    start: usize,
    negative: bool,
}

/// Finds the number at the end of `expr`. A `-` directly in front of it is
/// its sign only at the start of the expression or after an operator or
/// `(`; otherwise it is a subtraction.
fn trailing_number(expr: &str) -> Option<TrailingNumber> {
    let bytes = expr.as_bytes();
    let is_mantissa = |b: u8| b.is_ascii_digit() || b == b'.';
    let skip_mantissa = |mut i: usize| {
        while i > 0 && is_mantissa(bytes[i - 1]) {
            i -= 1;
        }
        i
    };

    let mut start = skip_mantissa(bytes.len());
    if start == bytes.len() {
        return None;
    }

    // exponent forms produced by format_result, e.g. 1.5e-7 or 1e20
    if start >= 3
        && matches!(bytes[start - 1], b'+' | b'-')
        && matches!(bytes[start - 2], b'e' | b'E')
        && is_mantissa(bytes[start - 3])
    {
        start = skip_mantissa(start - 2);
    } else if start >= 2 && matches!(bytes[start - 1], b'e' | b'E') && is_mantissa(bytes[start - 2]) {
        start = skip_mantissa(start - 1);
    }

    let signed = start >= 1
        && bytes[start - 1] == b'-'
        && (start == 1 || matches!(bytes[start - 2], b'+' | b'-' | b'*' | b'/' | b'%' | b'^' | b'('));
    if signed {
        Some(TrailingNumber { start: start - 1, negative: true })
    } else {
        Some(TrailingNumber { start, negative: false })
    }
}
