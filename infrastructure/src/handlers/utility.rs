//! Small self-contained utility handlers: current time and arithmetic.

use async_trait::async_trait;
use chrono::{FixedOffset, Local, Utc};
use switchyard_application::{InvocationContext, ToolHandler};
use switchyard_domain::ToolError;

use super::free_text_argument;

pub const CURRENT_TIME: &str = "current_time";
pub const CALCULATOR: &str = "calculator";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z (%A)";

/// Current date and time, optionally at a fixed UTC offset in hours
/// (`utc_offset`, e.g. `7` for Asia/Ho_Chi_Minh).
pub struct CurrentTimeHandler;

#[async_trait]
impl ToolHandler for CurrentTimeHandler {
    fn name(&self) -> &str {
        CURRENT_TIME
    }

    async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError> {
        let now = match ctx.arg("utc_offset").and_then(|v| v.as_i64()) {
            Some(hours) => {
                let offset = i32::try_from(hours)
                    .ok()
                    .and_then(|h| FixedOffset::east_opt(h * 3600))
                    .ok_or_else(|| {
                        ToolError::invalid_argument(format!("utc_offset out of range: {}", hours))
                    })?;
                Utc::now().with_timezone(&offset).format(TIME_FORMAT).to_string()
            }
            None => Local::now().format(TIME_FORMAT).to_string(),
        };
        Ok(format!("Current time: {}", now))
    }
}

/// Evaluates `+ - * /`, parentheses and unary minus over decimal numbers.
pub struct CalculatorHandler;

#[async_trait]
impl ToolHandler for CalculatorHandler {
    fn name(&self) -> &str {
        CALCULATOR
    }

    async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError> {
        let expression = free_text_argument(ctx, "expression")
            .ok_or_else(|| ToolError::invalid_argument("Missing expression"))?;
        let value = evaluate(&expression).map_err(ToolError::invalid_argument)?;
        Ok(format!("{} = {}", expression.trim(), format_number(value)))
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Longest expression accepted, in non-whitespace characters
pub const MAX_EXPRESSION_LEN: usize = 1024;

/// Deepest nesting of parentheses and unary minus
pub const MAX_NESTING: usize = 64;

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let mut parser = Parser {
        chars: expression.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
        depth: 0,
    };
    if parser.chars.is_empty() {
        return Err("Empty expression".to_string());
    }
    if parser.chars.len() > MAX_EXPRESSION_LEN {
        return Err(format!(
            "Expression too long (max {} characters)",
            MAX_EXPRESSION_LEN
        ));
    }
    let value = parser.expr()?;
    if let Some(c) = parser.peek() {
        return Err(format!("Unexpected '{}' at position {}", c, parser.pos));
    }
    if !value.is_finite() {
        return Err("Result is not a finite number".to_string());
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == '/' {
                if rhs == 0.0 {
                    return Err("Division by zero".to_string());
                }
                value /= rhs;
            } else {
                value *= rhs;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                let value = self.nested(Self::factor)?;
                Ok(-value)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::expr)?;
                if self.peek() != Some(')') {
                    return Err("Missing ')'".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(format!("Unexpected '{}' at position {}", c, self.pos)),
            None => Err("Unexpected end of expression".to_string()),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<f64, String>) -> Result<f64, String> {
        if self.depth >= MAX_NESTING {
            return Err("Expression nested too deeply".to_string());
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn number(&mut self) -> Result<f64, String> {
        let start = self.pos;
        while let Some(c) = self.peek()
            && (c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map_err(|_| format!("Invalid number '{}'", text))
    }
}
