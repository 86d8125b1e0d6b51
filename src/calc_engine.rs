//! Restricted arithmetic evaluator.
//!
//! Input is tokenized, parsed into an [`Expr`] tree and evaluated by walking
//! that tree. Only numbers, `+ - * / % ^` and parentheses are understood;
//! anything else is rejected by the tokenizer.

use thiserror::Error;

const MAX_DEPTH: usize = 256;
const MAX_TOKENS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Empty expression")]
    Empty,
    #[error("Unknown character: '{0}'")]
    UnknownCharacter(char),
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("Invalid expression: {0}")]
    Syntax(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Result is too large")]
    Overflow,
    #[error("Result is not a real number")]
    NotReal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Op(char),
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    /// Trailing `%`: the operand divided by 100.
    Percent(Box<Expr>),
}

impl Expr {
    fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary { op, operand: Box::new(operand) }
    }

    fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '+' | '-' | '*' | '/' | '^' | '%' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                let mut has_dot = false;
                let mut has_exp = false;

                while let Some(&ch) = chars.peek() {
                    match ch {
                        '.' if has_dot || has_exp => break,
                        '.' => {
                            has_dot = true;
                            num_str.push(ch);
                            chars.next();
                        }
                        'e' | 'E' if !has_exp => {
                            has_exp = true;
                            num_str.push(ch);
                            chars.next();

                            if let Some(&sign) = chars.peek() {
                                if sign == '+' || sign == '-' {
                                    num_str.push(sign);
                                    chars.next();
                                }
                            }
                        }
                        '0'..='9' => {
                            num_str.push(ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                let value = num_str
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(num_str.clone()))?;
                tokens.push(Token::Number(value));
            }
            _ => return Err(CalcError::UnknownCharacter(c)),
        }
    }
    Ok(tokens)
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, depth: 0 }
    }

    pub fn parse(&mut self) -> Result<Expr, CalcError> {
        if self.tokens.is_empty() {
            return Err(CalcError::Empty);
        }
        if self.tokens.len() > MAX_TOKENS {
            return Err(CalcError::Syntax("expression is too long".to_string()));
        }
        let expr = self.expr()?;
        if let Some(token) = self.peek() {
            return Err(CalcError::Syntax(format!("unexpected {}", describe(token))));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.current).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.current + offset).copied()
    }

    /// A `%` is modulo only when an operand follows it directly.
    fn percent_is_modulo(&self) -> bool {
        matches!(self.peek_at(1), Some(Token::Number(_)) | Some(Token::LParen))
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Op('+')) => BinaryOp::Add,
                Some(Token::Op('-')) => BinaryOp::Sub,
                _ => break,
            };
            self.current += 1;
            let right = self.term()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Op('*')) => BinaryOp::Mul,
                Some(Token::Op('/')) => BinaryOp::Div,
                Some(Token::Op('%')) if self.percent_is_modulo() => BinaryOp::Mod,
                _ => break,
            };
            self.current += 1;
            let right = self.unary()?;
            left = Expr::binary(left, op, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        let op = match self.peek() {
            Some(Token::Op('+')) => UnaryOp::Plus,
            Some(Token::Op('-')) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.current += 1;
        self.enter()?;
        let operand = self.unary();
        self.depth -= 1;
        Ok(Expr::unary(op, operand?))
    }

    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.postfix()?;

        if self.peek() == Some(Token::Op('^')) {
            self.current += 1;
            self.enter()?;
            let exponent = self.unary();
            self.depth -= 1;
            Ok(Expr::binary(base, BinaryOp::Pow, exponent?))
        } else {
            Ok(base)
        }
    }

    fn postfix(&mut self) -> Result<Expr, CalcError> {
        let mut operand = self.primary()?;

        while self.peek() == Some(Token::Op('%')) && !self.percent_is_modulo() {
            self.current += 1;
            operand = Expr::Percent(Box::new(operand));
        }
        Ok(operand)
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.current += 1;
                Ok(Expr::Number(n))
            }
            Some(Token::LParen) => {
                self.current += 1;
                self.enter()?;
                let inner = self.expr();
                self.depth -= 1;
                let inner = inner?;
                if self.peek() == Some(Token::RParen) {
                    self.current += 1;
                    Ok(inner)
                } else {
                    Err(CalcError::Syntax("missing closing parenthesis".to_string()))
                }
            }
            Some(token) => Err(CalcError::Syntax(format!("unexpected {}", describe(token)))),
            None => Err(CalcError::Syntax("unexpected end of input".to_string())),
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::Syntax("expression nested too deeply".to_string()));
        }
        self.depth += 1;
        Ok(())
    }
}

fn describe(token: Token) -> String {
    match token {
        Token::Number(n) => format!("number {}", n),
        Token::Op(c) => format!("operator '{}'", c),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
    }
}

pub fn evaluate(expr: &Expr) -> Result<f64, CalcError> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::Unary { op: UnaryOp::Plus, operand } => evaluate(operand)?,
        Expr::Unary { op: UnaryOp::Minus, operand } => -evaluate(operand)?,
        Expr::Percent(operand) => evaluate(operand)? / 100.0,
        Expr::Binary { op, left, right } => {
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            apply_binary(*op, left, right)?
        }
    };
    check_finite(value)
}

fn apply_binary(op: BinaryOp, left: f64, right: f64) -> Result<f64, CalcError> {
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div => {
            if right == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            Ok(left / right)
        }
        BinaryOp::Mod => {
            if right == 0.0 {
                return Err(CalcError::ModuloByZero);
            }
            Ok(floored_rem(left, right))
        }
        BinaryOp::Pow => {
            if left == 0.0 && right < 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            Ok(left.powf(right))
        }
    }
}

/// Remainder whose sign follows the divisor.
fn floored_rem(left: f64, right: f64) -> f64 {
    let rem = left % right;
    if rem != 0.0 && (rem < 0.0) != (right < 0.0) {
        rem + right
    } else {
        rem
    }
}

fn check_finite(value: f64) -> Result<f64, CalcError> {
    if value.is_nan() {
        Err(CalcError::NotReal)
    } else if value.is_infinite() {
        Err(CalcError::Overflow)
    } else {
        Ok(value)
    }
}

pub fn parse_str(input: &str) -> Result<Expr, CalcError> {
    if input.trim().is_empty() {
        return Err(CalcError::Empty);
    }
    Parser::new(tokenize(input)?).parse()
}

pub fn eval_str(input: &str) -> Result<f64, CalcError> {
    evaluate(&parse_str(input)?)
}

/// Formats a result for the display: integers below `1e10` without a
/// fraction, other values with ten significant digits. Magnitudes below
/// `1e-4` or from `1e10` up use exponent form. The output always tokenizes
/// back into a single number.
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return "Error".to_string();
    }
    if value == value.trunc() && value.abs() < 1e10 {
        return format!("{}", value as i64);
    }

    let exponent = value.abs().log10().floor() as i32;
    if !(-4..10).contains(&exponent) {
        let formatted = format!("{:.9e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (9 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(input: &str) -> f64 {
        eval_str(input).unwrap()
    }

    #[test]
    fn tokenizes_numbers_and_operators() {
        assert_eq!(
            tokenize("12.5+(3*.5)").unwrap(),
            vec![
                Token::Number(12.5),
                Token::Op('+'),
                Token::LParen,
                Token::Number(3.0),
                Token::Op('*'),
                Token::Number(0.5),
                Token::RParen,
            ]
        );
        assert_eq!(tokenize("1.5e-7").unwrap(), vec![Token::Number(1.5e-7)]);
        assert_eq!(tokenize(" 5. ").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn rejects_anything_outside_arithmetic() {
        assert_eq!(tokenize("abs(2)"), Err(CalcError::UnknownCharacter('a')));
        assert_eq!(tokenize("2**3").map(|t| t.len()), Ok(4));
        assert_eq!(eval_str("2**3"), Err(CalcError::Syntax("unexpected operator '*'".to_string())));
        assert_eq!(eval_str("x.y"), Err(CalcError::UnknownCharacter('x')));
        assert_eq!(eval_str("2;3"), Err(CalcError::UnknownCharacter(';')));
        assert!(matches!(eval_str("1..2"), Err(CalcError::InvalidNumber(_)) | Err(CalcError::Syntax(_))));
    }

    #[test]
    fn standard_precedence() {
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("64/4/2"), 8.0);
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("2*3^2"), 18.0);
    }

    #[test]
    fn unary_signs() {
        assert_eq!(eval("-5+10"), 5.0);
        assert_eq!(eval("3--5"), 8.0);
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("2^-1"), 0.5);
        assert_eq!(eval("+-+3"), -3.0);
        assert_eq!(eval("(-2)^2"), 4.0);
    }

    #[test]
    fn percent_is_postfix_when_nothing_follows() {
        assert_eq!(eval("50%"), 0.5);
        assert_eq!(eval("200*10%"), 20.0);
        assert_eq!(eval("50%+1"), 1.5);
        assert_eq!(eval("(20+30)%"), 0.5);
        assert_eq!(eval("5%%"), 5.0 / 100.0 / 100.0);
    }

    #[test]
    fn percent_is_modulo_before_an_operand() {
        assert_eq!(eval("17%5"), 2.0);
        assert_eq!(eval("7%(4)"), 3.0);
        assert_eq!(eval("2+17%5*3"), 8.0);
        assert_eq!(eval("-7%3"), 2.0);
        assert_eq!(eval("7%(-3)"), -2.0);
        assert_eq!(eval("5.5%2"), 1.5);
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(eval_str("1/0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval_str("1/(2-2)"), Err(CalcError::DivisionByZero));
        assert_eq!(eval_str("5%0"), Err(CalcError::ModuloByZero));
        assert_eq!(eval_str("0^-1"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn non_finite_results_are_reported() {
        assert_eq!(eval_str("10^400"), Err(CalcError::Overflow));
        assert_eq!(eval_str("(0-8)^0.5"), Err(CalcError::NotReal));
    }

    #[test]
    fn malformed_input_is_a_syntax_error() {
        assert_eq!(eval_str(""), Err(CalcError::Empty));
        assert_eq!(eval_str("   "), Err(CalcError::Empty));
        assert!(matches!(eval_str("1+"), Err(CalcError::Syntax(_))));
        assert!(matches!(eval_str("(1+2"), Err(CalcError::Syntax(_))));
        assert!(matches!(eval_str("1+2)"), Err(CalcError::Syntax(_))));
        assert!(matches!(eval_str("2(3)"), Err(CalcError::Syntax(_))));
        assert!(matches!(eval_str("%5"), Err(CalcError::Syntax(_))));
        assert!(matches!(eval_str("()"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn deep_nesting_is_rejected_without_overflowing_the_stack() {
        let deep = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert_eq!(
            eval_str(&deep),
            Err(CalcError::Syntax("expression nested too deeply".to_string()))
        );
        let signs = format!("{}1", "-".repeat(1_000));
        assert!(matches!(eval_str(&signs), Err(CalcError::Syntax(_))));
        let long = "1+".repeat(5_000) + "1";
        assert_eq!(
            eval_str(&long),
            Err(CalcError::Syntax("expression is too long".to_string()))
        );
        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(eval_str(&shallow), Ok(1.0));
    }

    #[test]
    fn parse_builds_the_expected_tree() {
        assert_eq!(
            parse_str("1-2%").unwrap(),
            Expr::binary(
                Expr::Number(1.0),
                BinaryOp::Sub,
                Expr::Percent(Box::new(Expr::Number(2.0)))
            )
        );
        assert_eq!(
            parse_str("-2^2").unwrap(),
            Expr::unary(
                UnaryOp::Minus,
                Expr::binary(Expr::Number(2.0), BinaryOp::Pow, Expr::Number(2.0))
            )
        );
    }

    #[test]
    fn formats_results() {
        assert_eq!(format_result(4.0), "4");
        assert_eq!(format_result(-0.0), "0");
        assert_eq!(format_result(0.5), "0.5");
        assert_eq!(format_result(-2.25), "-2.25");
        assert_eq!(format_result(0.1 + 0.2), "0.3");
        assert_eq!(format_result(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_result(2.0 / 3.0 * 1000.0), "666.6666667");
        assert_eq!(format_result(1e20), "1e20");
        assert_eq!(format_result(1.5e-7), "1.5e-7");
        assert_eq!(format_result(12345678901.5), "1.23456789e10");
        assert_eq!(format_result(9999999999.0), "9999999999");
        assert_eq!(format_result(1e10), "1e10");
        assert_eq!(format_result(1e12), "1e12");
        assert_eq!(format_result(-12345678901.0), "-1.23456789e10");
        assert_eq!(format_result(f64::NAN), "Error");
        assert_eq!(format_result(f64::INFINITY), "Error");
    }

    #[test]
    fn errors_render_user_messages() {
        assert_eq!(CalcError::DivisionByZero.to_string(), "Division by zero");
        assert_eq!(CalcError::UnknownCharacter('x').to_string(), "Unknown character: 'x'");
        assert_eq!(
            CalcError::Syntax("missing closing parenthesis".to_string()).to_string(),
            "Invalid expression: missing closing parenthesis"
        );
    }
}
