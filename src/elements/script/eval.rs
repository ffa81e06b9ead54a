//! Tree-walking evaluator for handler scripts.

use serde_json::{Map, Value};

use super::parser::{number, BinaryOp, Expr, Stmt, UnaryOp};
use super::{HandlerScope, ScriptError};
use crate::dom::Element;
use crate::elements::display_value;
use crate::registry::is_truthy;

/// Run `stmts` against `scope`, stopping at the first error.
pub fn run(stmts: &[Stmt], scope: &HandlerScope<'_>) -> Result<(), ScriptError> {
    let eval = Evaluator { scope };
    for stmt in stmts {
        match stmt {
            Stmt::Expr(expr) => {
                eval.expr(expr)?;
            }
            Stmt::Assign(target, value) => {
                let value = eval.expr(value)?.into_json()?;
                eval.assign(target, value)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A runtime value: plain JSON or a reference into the host.
#[derive(Debug, Clone)]
enum Val {
    Json(Value),
    Element(Element),
    ClassList(Element),
    Style(Element),
    Event,
    Uizy,
    Method(Box<Val>, String),
    Global(&'static str),
}

impl Val {
    fn describe(&self) -> &'static str {
        match self {
            Val::Json(Value::Null) => "null",
            Val::Json(_) => "value",
            Val::Element(_) => "element",
            Val::ClassList(_) => "classList",
            Val::Style(_) => "style",
            Val::Event => "event",
            Val::Uizy => "uizy",
            Val::Method(..) | Val::Global(_) => "function",
        }
    }

    fn into_json(self) -> Result<Value, ScriptError> {
        match self {
            Val::Json(value) => Ok(value),
            other => Err(ScriptError::Type(format!(
                "{} cannot be used as a value",
                other.describe()
            ))),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Val::Json(value) => is_truthy(value),
            _ => true,
        }
    }
}

fn method(recv: Val, name: &str) -> Val {
    Val::Method(Box::new(recv), name.to_owned())
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

struct Evaluator<'s, 'a> {
    scope: &'s HandlerScope<'a>,
}

impl Evaluator<'_, '_> {
    fn expr(&self, expr: &Expr) -> Result<Val, ScriptError> {
        match expr {
            Expr::Literal(value) => Ok(Val::Json(value.clone())),
            Expr::Ident(name) => self.ident(name),
            Expr::Member(object, name) => self.member(self.expr(object)?, name),
            Expr::Index(object, index) => {
                let object = self.expr(object)?;
                let index = self.expr(index)?.into_json()?;
                match index {
                    Value::String(key) => self.member(object, &key),
                    Value::Number(n) => {
                        let Val::Json(Value::Array(items)) = object else {
                            return Err(ScriptError::Type(format!(
                                "cannot index {} by number",
                                object.describe()
                            )));
                        };
                        let item = n
                            .as_u64()
                            .and_then(|i| items.get(i as usize).cloned())
                            .unwrap_or(Value::Null);
                        Ok(Val::Json(item))
                    }
                    other => Err(ScriptError::Type(format!("invalid index {other}"))),
                }
            }
            Expr::Call(callee, args) => {
                let callee = self.expr(callee)?;
                let args = args
                    .iter()
                    .map(|a| self.expr(a)?.into_json())
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(callee, &args)
            }
            Expr::Object(props) => {
                let mut map = Map::new();
                for (key, value) in props {
                    map.insert(key.clone(), self.expr(value)?.into_json()?);
                }
                Ok(Val::Json(Value::Object(map)))
            }
            Expr::Array(items) => Ok(Val::Json(Value::Array(
                items
                    .iter()
                    .map(|i| self.expr(i)?.into_json())
                    .collect::<Result<_, _>>()?,
            ))),
            Expr::Unary(op, operand) => {
                let operand = self.expr(operand)?;
                Ok(Val::Json(match op {
                    UnaryOp::Not => Value::Bool(!operand.truthy()),
                    UnaryOp::Neg => number(-to_number(&operand.into_json()?)),
                }))
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let lhs = self.expr(lhs)?;
                if lhs.truthy() {
                    self.expr(rhs)
                } else {
                    Ok(lhs)
                }
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let lhs = self.expr(lhs)?;
                if lhs.truthy() {
                    Ok(lhs)
                } else {
                    self.expr(rhs)
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.expr(lhs)?.into_json()?;
                let rhs = self.expr(rhs)?.into_json()?;
                Ok(Val::Json(binary(*op, &lhs, &rhs)))
            }
            Expr::Conditional(cond, then, otherwise) => {
                if self.expr(cond)?.truthy() {
                    self.expr(then)
                } else {
                    self.expr(otherwise)
                }
            }
        }
    }

    fn ident(&self, name: &str) -> Result<Val, ScriptError> {
        match name {
            "el" | "$el" | "this" => Ok(Val::Element(self.scope.element.clone())),
            "event" | "$event" => Ok(Val::Event),
            "uizy" => Ok(Val::Uizy),
            "$" | "$emit" if self.scope.host.globals() => {
                Ok(Val::Global(if name == "$" { "$" } else { "$emit" }))
            }
            "$" | "$emit" => Err(ScriptError::GlobalsDisabled(name.to_owned())),
            _ => Err(ScriptError::UnknownIdentifier(name.to_owned())),
        }
    }

    fn member(&self, object: Val, name: &str) -> Result<Val, ScriptError> {
        let unknown = |target| ScriptError::UnknownProperty {
            target,
            name: name.to_owned(),
        };
        match object {
            Val::Element(el) => Ok(match name {
                "textContent" => Val::Json(Value::String(el.text_content())),
                "className" => Val::Json(Value::String(el.class_name())),
                "id" => Val::Json(Value::String(el.get_attribute("id").unwrap_or_default())),
                "tagName" => Val::Json(Value::String(el.tag_name().to_ascii_uppercase())),
                "classList" => Val::ClassList(el),
                "style" => Val::Style(el),
                "setAttribute" | "removeAttribute" | "getAttribute" | "hasAttribute" => {
                    method(Val::Element(el), name)
                }
                _ => return Err(unknown("element")),
            }),
            Val::ClassList(el) => match name {
                "add" | "remove" | "toggle" | "contains" => Ok(method(Val::ClassList(el), name)),
                "length" => Ok(Val::Json(Value::from(el.class_list().len()))),
                _ => Err(unknown("classList")),
            },
            Val::Style(el) => Ok(Val::Json(Value::String(
                el.style().get(&kebab_case(name)).unwrap_or_default(),
            ))),
            Val::Event => {
                let event = self.scope.event;
                Ok(match name {
                    "type" => Val::Json(Value::String(event.kind().to_owned())),
                    "detail" => Val::Json(event.detail().clone()),
                    "target" => event.target().map_or(Val::Json(Value::Null), Val::Element),
                    "currentTarget" => event
                        .current_target()
                        .map_or(Val::Json(Value::Null), Val::Element),
                    "defaultPrevented" => Val::Json(Value::Bool(event.default_prevented())),
                    "preventDefault" | "stopPropagation" => method(Val::Event, name),
                    _ => return Err(unknown("event")),
                })
            }
            Val::Uizy => match name {
                "emit" | "$" | "$set" | "$key" | "use" => Ok(method(Val::Uizy, name)),
                _ => Err(unknown("uizy")),
            },
            Val::Json(Value::Null) => Err(ScriptError::Type(format!(
                "cannot read `{name}` of null"
            ))),
            Val::Json(value) => Ok(Val::Json(json_member(&value, name))),
            Val::Method(..) | Val::Global(_) => Err(unknown("function")),
        }
    }

    fn call(&self, callee: Val, args: &[Value]) -> Result<Val, ScriptError> {
        let host = self.scope.host;
        let (recv, name) = match callee {
            Val::Method(recv, name) => (*recv, name),
            Val::Global("$") => {
                let path = string_arg(args, 0, "$")?;
                return Ok(Val::Json(host.store_value(&path)?));
            }
            Val::Global(_) => {
                let path = string_arg(args, 0, "$emit")?;
                return Ok(Val::Json(host.emit(&path, &optional(args, 1))?));
            }
            other => return Err(ScriptError::NotCallable(other.describe().to_owned())),
        };

        let out = match (recv, name.as_str()) {
            (Val::Element(el), "setAttribute") => {
                let attr = string_arg(args, 0, &name)?;
                el.set_attribute(&attr, &display_value(&required(args, 1, &name, 2)?));
                Value::Null
            }
            (Val::Element(el), "removeAttribute") => {
                el.remove_attribute(&string_arg(args, 0, &name)?);
                Value::Null
            }
            (Val::Element(el), "getAttribute") => el
                .get_attribute(&string_arg(args, 0, &name)?)
                .map_or(Value::Null, Value::String),
            (Val::Element(el), "hasAttribute") => {
                Value::Bool(el.has_attribute(&string_arg(args, 0, &name)?))
            }
            (Val::ClassList(el), "add") => {
                for token in args {
                    el.class_list().add(&display_value(token));
                }
                Value::Null
            }
            (Val::ClassList(el), "remove") => {
                for token in args {
                    el.class_list().remove(&display_value(token));
                }
                Value::Null
            }
            (Val::ClassList(el), "toggle") => {
                let class = string_arg(args, 0, &name)?;
                Value::Bool(match args.get(1) {
                    Some(force) => el.class_list().toggle_force(&class, is_truthy(force)),
                    None => el.class_list().toggle(&class),
                })
            }
            (Val::ClassList(el), "contains") => {
                Value::Bool(el.class_list().contains(&string_arg(args, 0, &name)?))
            }
            (Val::Event, "preventDefault") => {
                self.scope.event.prevent_default();
                Value::Null
            }
            (Val::Event, "stopPropagation") => {
                self.scope.event.stop_propagation();
                Value::Null
            }
            (Val::Uizy, "emit") => host.emit(&string_arg(args, 0, &name)?, &optional(args, 1))?,
            (Val::Uizy, "$") => host.store_value(&string_arg(args, 0, &name)?)?,
            (Val::Uizy, "$set") => {
                let path = string_arg(args, 0, &name)?;
                host.set_store(&path, required(args, 1, &name, 2)?);
                Value::Null
            }
            (Val::Uizy, "$key") => {
                let path = string_arg(args, 0, &name)?;
                let key = string_arg(args, 1, &name)?;
                host.set_store_key(&path, &key, required(args, 2, &name, 3)?);
                Value::Null
            }
            (Val::Uizy, "use") => {
                let paths = required(args, 0, &name, 1)?;
                Value::String(host.use_classes(&paths, &optional(args, 1))?)
            }
            _ => return Err(ScriptError::NotCallable(name.clone())),
        };
        Ok(Val::Json(out))
    }

    fn assign(&self, target: &Expr, value: Value) -> Result<(), ScriptError> {
        let Expr::Member(object, name) = target else {
            return Err(ScriptError::InvalidAssignment);
        };
        match self.expr(object)? {
            Val::Element(el) => match name.as_str() {
                "textContent" => el.set_text_content(&display_value(&value)),
                "className" => el.set_class_name(&display_value(&value)),
                "id" => el.set_attribute("id", &display_value(&value)),
                _ => {
                    return Err(ScriptError::NotAssignable {
                        target: "element",
                        name: name.clone(),
                    })
                }
            },
            Val::Style(el) => el.style().set(&kebab_case(name), &display_value(&value)),
            other => {
                return Err(ScriptError::NotAssignable {
                    target: other.describe(),
                    name: name.clone(),
                })
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn required(args: &[Value], index: usize, name: &str, expected: usize) -> Result<Value, ScriptError> {
    args.get(index).cloned().ok_or_else(|| ScriptError::Arity {
        name: name.to_owned(),
        expected,
    })
}

fn optional(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

fn string_arg(args: &[Value], index: usize, name: &str) -> Result<String, ScriptError> {
    required(args, index, name, index + 1).map(|v| display_value(&v))
}

fn json_member(value: &Value, name: &str) -> Value {
    match (value, name) {
        (Value::String(s), "length") => Value::from(s.chars().count()),
        (Value::Array(items), "length") => Value::from(items.len()),
        (Value::Object(map), _) => map.get(name).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// `backgroundColor` -> `background-color`; names with dashes pass through.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => lhs == rhs,
    }
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinaryOp::Add if lhs.is_string() || rhs.is_string() => {
            Value::String(format!("{}{}", display_value(lhs), display_value(rhs)))
        }
        BinaryOp::Add => number(to_number(lhs) + to_number(rhs)),
        BinaryOp::Sub => number(to_number(lhs) - to_number(rhs)),
        BinaryOp::Eq => Value::Bool(loose_eq(lhs, rhs)),
        BinaryOp::NotEq => Value::Bool(!loose_eq(lhs, rhs)),
        // Short-circuit operators never reach here.
        BinaryOp::And | BinaryOp::Or => Value::Null,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
