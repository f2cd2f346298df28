//! Tree-walking evaluation of a parsed script.
//!
//! An [`Interpreter`] lives for exactly one evaluation. It starts with the
//! vocabulary and the script's own top-level items, evaluates the top-level
//! `let`s in source order, calls the entry point and converts its return
//! value into elements. Every node visited is charged to the [`Sandbox`].

mod collect;
mod ops;
mod place;
mod scope;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use padforge_core::element::Element;
use padforge_parser::{
    Span, Spanned,
    ast::{
        Argument, BinaryOp, Block, Expr, ExprKind, FunctionDef, Item, Script, Stmt, StmtKind,
        UnaryOp,
    },
};

use crate::{
    config::LimitsConfig,
    fault::Fault,
    sandbox::Sandbox,
    value::{Sequence, Value, get_field},
    vocabulary::{Args, Builtin, call_method, mutates},
};
use place::{Place, Step, out_of_range, update_path};
use scope::Locals;

/// Name of the zero-parameter function every script must define.
pub const ENTRY_POINT: &str = "footprint";

/// Frame name for faults raised while evaluating top-level `let`s.
const TOP_LEVEL: &str = "<top-level>";

/// Evaluates `script` and returns the flattened elements of its entry point.
pub(crate) fn run(script: &Script, limits: LimitsConfig) -> Result<Vec<Element>, Fault> {
    let mut interpreter = Interpreter::new(script, limits);
    interpreter.load_globals(script)?;
    let value = interpreter.call_entry_point(script)?;
    let elements = collect::into_elements(value, limits.max_collection_len())?;
    debug!(
        operations = interpreter.sandbox.operations(),
        elements = elements.len();
        "Evaluation finished"
    );
    Ok(elements)
}

/// Outcome of executing a statement.
enum Flow {
    Next,
    Return(Value),
}

/// A step of an assignment target before its index expressions are
/// evaluated.
enum Link<'e> {
    Field(&'e Spanned<String>),
    Index(&'e Expr),
}

struct Interpreter<'a> {
    functions: HashMap<&'a str, &'a FunctionDef>,
    /// Values of top-level `let`s; read-only to functions
    globals: IndexMap<String, Value>,
    /// One entry per active function call, innermost last
    frames: Vec<Locals>,
    sandbox: Sandbox,
}

impl<'a> Interpreter<'a> {
    fn new(script: &'a Script, limits: LimitsConfig) -> Self {
        Self {
            functions: script
                .functions()
                .map(|function| (function.name.inner().as_str(), function))
                .collect(),
            globals: IndexMap::new(),
            frames: Vec::new(),
            sandbox: Sandbox::new(limits),
        }
    }

    fn load_globals(&mut self, script: &Script) -> Result<(), Fault> {
        for item in &script.items {
            if let Item::Let { name, value } = item {
                let value = self
                    .eval(value)
                    .map_err(|fault| fault.leave_function(TOP_LEVEL, name.span()))?;
                self.globals.insert(name.inner().clone(), value);
            }
        }
        Ok(())
    }

    fn call_entry_point(&mut self, script: &Script) -> Result<Value, Fault> {
        if let Some(function) = self.functions.get(ENTRY_POINT).copied() {
            if let Some(param) = function.params.first() {
                return Err(Fault::entry_point(format!(
                    "`{ENTRY_POINT}` must take no parameters, but takes {}",
                    function.params.len()
                ))
                .at(param.span())
                .with_help(format!("declare it as `fn {ENTRY_POINT}() {{ ... }}`")));
            }
            debug!(function = ENTRY_POINT; "Calling entry point");
            return self.invoke(function, Locals::new(), function.name.span());
        }

        if let Some(value) = self.globals.get(ENTRY_POINT) {
            let fault = Fault::entry_point(format!(
                "`{ENTRY_POINT}` must be a function, got {}",
                value.type_name()
            ));
            let span = script
                .items
                .iter()
                .map(Item::name)
                .find(|name| name.inner() == ENTRY_POINT)
                .map(Spanned::span);
            return Err(match span {
                Some(span) => fault.at(span),
                None => fault,
            });
        }

        Err(
            Fault::entry_point(format!("script does not define `{ENTRY_POINT}`")).with_help(
                format!("define `fn {ENTRY_POINT}() {{ ... }}` returning the footprint's elements"),
            ),
        )
    }

    // -------------------------------------------------------------------------
    // Calls
    // -------------------------------------------------------------------------

    fn call_function(&mut self, name: &str, args: Args, call_span: Span) -> Result<Value, Fault> {
        let function = self
            .functions
            .get(name)
            .copied()
            .ok_or_else(|| Fault::runtime(format!("undefined function `{name}`")))?;
        let params: Vec<&str> = function
            .params
            .iter()
            .map(|param| param.inner().as_str())
            .collect();
        let mut bound = args.bind(name, &params)?;

        let mut locals = Locals::new();
        for param in params {
            let value = bound.require(param)?;
            locals.declare(param, value);
        }
        self.invoke(function, locals, call_span)
    }

    /// Runs `function` in a new frame holding `locals`.
    fn invoke(
        &mut self,
        function: &'a FunctionDef,
        locals: Locals,
        call_span: Span,
    ) -> Result<Value, Fault> {
        let max_depth = self.sandbox.limits().max_call_depth();
        if self.frames.len() >= max_depth {
            return Err(Fault::runtime(format!(
                "maximum call depth of {max_depth} exceeded"
            ))
            .at(call_span));
        }

        trace!(
            function = function.name.inner().as_str(),
            depth = self.frames.len();
            "Entering function"
        );
        self.frames.push(locals);
        let flow = self.exec_block(&function.body);
        self.frames.pop();

        match flow {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Next) => Ok(Value::None),
            Err(fault) => Err(fault.leave_function(function.name.inner(), call_span)),
        }
    }

    fn locals_mut(&mut self) -> Result<&mut Locals, Fault> {
        self.frames
            .last_mut()
            .ok_or_else(|| Fault::internal("statement executed outside of a function"))
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn exec_block(&mut self, block: &Block) -> Result<Flow, Fault> {
        self.locals_mut()?.push_scope();
        let flow = self.exec_statements(&block.statements);
        self.locals_mut()?.pop_scope();
        flow
    }

    fn exec_statements(&mut self, statements: &[Stmt]) -> Result<Flow, Fault> {
        for statement in statements {
            if let Flow::Return(value) = self.exec(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Next)
    }

    fn exec(&mut self, statement: &Stmt) -> Result<Flow, Fault> {
        self.sandbox
            .tick()
            .map_err(|fault| fault.at(statement.span()))?;

        match statement.inner() {
            StmtKind::Let { name, value } => {
                let value = self.eval(value)?;
                self.locals_mut()?.declare(name.inner(), value);
            }
            StmtKind::Assign { target, op, value } => {
                let value = self.eval(value)?;
                let place = self.resolve_place(target)?;
                let written = match op.binary_op() {
                    None => self.update_place(&place, |slot, _| {
                        *slot = value;
                        Ok(())
                    }),
                    Some(op) => self.update_place(&place, |slot, sandbox| {
                        let current = std::mem::replace(slot, Value::None);
                        *slot = ops::binary(op, current, value, sandbox)?;
                        Ok(())
                    }),
                };
                written.map_err(|fault| fault.at(target.span()))?;
            }
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::If {
                branches,
                otherwise,
            } => {
                for (condition, block) in branches {
                    if self.truth(condition, "if")? {
                        return self.exec_block(block);
                    }
                }
                if let Some(block) = otherwise {
                    return self.exec_block(block);
                }
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                let items = match self.eval(iterable)? {
                    Value::List(items) | Value::Tuple(items) => items,
                    other => {
                        return Err(Fault::runtime(format!(
                            "cannot iterate over {}",
                            other.type_name()
                        ))
                        .at(iterable.span()));
                    }
                };
                for item in items.iter() {
                    self.locals_mut()?.push_scope();
                    self.locals_mut()?.declare(var.inner(), item.clone());
                    let flow = self.exec_statements(&body.statements);
                    self.locals_mut()?.pop_scope();
                    if let Flow::Return(value) = flow? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
        }
        Ok(Flow::Next)
    }

    // -------------------------------------------------------------------------
    // Places
    // -------------------------------------------------------------------------

    fn resolve_place(&mut self, target: &Expr) -> Result<Place, Fault> {
        let mut links = Vec::new();
        let mut current = target;
        let root = loop {
            match current.inner() {
                ExprKind::Name(name) => break name,
                ExprKind::Field { object, field } => {
                    links.push(Link::Field(field));
                    current = object;
                }
                ExprKind::Index { object, index } => {
                    links.push(Link::Index(index));
                    current = object;
                }
                _ => {
                    return Err(
                        Fault::runtime("cannot assign to this expression").at(current.span())
                    );
                }
            }
        };

        let mut steps = Vec::with_capacity(links.len());
        for link in links.into_iter().rev() {
            steps.push(match link {
                Link::Field(field) => Step::Field {
                    name: field.inner().clone(),
                    span: field.span(),
                },
                Link::Index(index) => Step::Index {
                    index: self.eval_index(index)?,
                    span: index.span(),
                },
            });
        }

        Ok(Place {
            root: root.clone(),
            root_span: current.span(),
            steps,
        })
    }

    /// Applies `write` to the storage named by `place`. Only local variables
    /// are writable.
    fn update_place<T>(
        &mut self,
        place: &Place,
        write: impl FnOnce(&mut Value, &mut Sandbox) -> Result<T, Fault>,
    ) -> Result<T, Fault> {
        let Self {
            functions,
            globals,
            frames,
            sandbox,
        } = self;

        let Some(root) = frames
            .last_mut()
            .and_then(|locals| locals.get_mut(&place.root))
        else {
            let name = &place.root;
            let fault = if globals.contains_key(name) || functions.contains_key(name.as_str()) {
                Fault::runtime(format!("cannot assign to top-level `{name}`"))
                    .with_help(format!("copy it into a local first: `let {name} = {name};`"))
            } else if Builtin::lookup(name).is_some() {
                Fault::runtime(format!("cannot assign to builtin `{name}`"))
            } else {
                Fault::runtime(format!("undefined name `{name}`"))
                    .with_help(format!("declare it first with `let {name} = ...;`"))
            };
            return Err(fault.at(place.root_span));
        };

        let result = update_path(root, &place.steps, sandbox, write)?;
        sandbox.check_value(root)?;
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn eval(&mut self, expr: &Expr) -> Result<Value, Fault> {
        self.eval_kind(expr).map_err(|fault| fault.at(expr.span()))
    }

    fn eval_kind(&mut self, expr: &Expr) -> Result<Value, Fault> {
        self.sandbox.tick()?;

        let value = match expr.inner() {
            ExprKind::Int(number) => Value::Int(*number),
            ExprKind::Float(number) => Value::Float(*number),
            ExprKind::Str(text) => Value::Str(text.clone()),
            ExprKind::Bool(flag) => Value::Bool(*flag),
            ExprKind::None => Value::None,
            ExprKind::Name(name) => self.lookup(name)?,
            ExprKind::List(items) => Value::List(self.eval_items(items)?),
            ExprKind::Tuple(items) => Value::Tuple(self.eval_items(items)?),
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Neg => ops::negate(self.eval(operand)?)?,
                UnaryOp::Not => Value::Bool(!self.truth(operand, "not")?),
            },
            ExprKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => {
                let what = op.symbol();
                let left = self.truth(left, what)?;
                let decided = match op {
                    BinaryOp::And => !left,
                    _ => left,
                };
                if decided {
                    Value::Bool(left)
                } else {
                    Value::Bool(self.truth(right, what)?)
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, left, right, &mut self.sandbox)?
            }
            ExprKind::Call { callee, args } => {
                let target = self.eval(callee)?;
                let args = self.eval_args(args)?;
                match target {
                    Value::Builtin(builtin) => builtin.call(args, &mut self.sandbox)?,
                    Value::Function(name) => self.call_function(&name, args, expr.span())?,
                    other => {
                        return Err(Fault::runtime(format!(
                            "{} is not callable",
                            other.type_name()
                        ))
                        .at(callee.span()));
                    }
                }
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => self
                .eval_method(receiver, method, args)
                .map_err(|fault| fault.at(method.span()))?,
            ExprKind::Field { object, field } => {
                let object = self.eval(object)?;
                read_field(&object, field)?
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object)?;
                let position = self.eval_index(index)?;
                read_index(&object, position).map_err(|fault| fault.at(index.span()))?
            }
        };
        Ok(value)
    }

    fn lookup(&self, name: &str) -> Result<Value, Fault> {
        if let Some(value) = self.frames.last().and_then(|locals| locals.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if self.functions.contains_key(name) {
            return Ok(Value::Function(name.to_string()));
        }
        Builtin::lookup(name)
            .map(Value::Builtin)
            .ok_or_else(|| Fault::runtime(format!("undefined name `{name}`")))
    }

    /// Evaluates `expr` as an operand that must be a bool.
    fn truth(&mut self, expr: &Expr, what: &str) -> Result<bool, Fault> {
        match self.eval(expr)? {
            Value::Bool(flag) => Ok(flag),
            other => Err(Fault::runtime(format!(
                "`{what}` expects a bool, got {}",
                other.type_name()
            ))
            .at(expr.span())),
        }
    }

    fn eval_items(&mut self, items: &[Expr]) -> Result<Sequence, Fault> {
        self.sandbox.check_len(items.len())?;
        let values = items
            .iter()
            .map(|item| self.eval(item))
            .collect::<Result<Vec<_>, _>>()?;
        let sequence = Sequence::new(values);
        self.sandbox.check_sequence(&sequence)?;
        Ok(sequence)
    }

    fn eval_index(&mut self, index: &Expr) -> Result<i64, Fault> {
        match self.eval(index)? {
            Value::Int(position) => Ok(position),
            other => Err(Fault::runtime(format!(
                "indices must be ints, got {}",
                other.type_name()
            ))
            .at(index.span())),
        }
    }

    fn eval_args(&mut self, args: &[Argument]) -> Result<Args, Fault> {
        let mut evaluated = Args::default();
        for argument in args {
            let value = self.eval(&argument.value)?;
            match &argument.name {
                Some(name) => evaluated
                    .push_keyword(name.inner(), value)
                    .map_err(|fault| fault.at(name.span()))?,
                None => evaluated.push_positional(value),
            }
        }
        Ok(evaluated)
    }

    /// Mutating methods on a place write the changed receiver back; any
    /// other receiver is evaluated into a temporary.
    fn eval_method(
        &mut self,
        receiver: &Expr,
        method: &Spanned<String>,
        args: &[Argument],
    ) -> Result<Value, Fault> {
        let name = method.inner().as_str();
        if mutates(name) && receiver.inner().is_place() {
            let place = self.resolve_place(receiver)?;
            let args = self.eval_args(args)?;
            return self.update_place(&place, |slot, sandbox| {
                call_method(slot, name, args, sandbox)
            });
        }

        let mut value = self.eval(receiver)?;
        let args = self.eval_args(args)?;
        call_method(&mut value, name, args, &mut self.sandbox)
    }
}

fn read_field(object: &Value, field: &Spanned<String>) -> Result<Value, Fault> {
    let name = field.inner();
    let found = match object {
        Value::Element(element) => get_field(element, name),
        _ => None,
    };
    found.ok_or_else(|| {
        let owner = match object {
            Value::Element(element) => element.variant_name(),
            other => other.type_name(),
        };
        Fault::runtime(format!("{owner} has no field `{name}`")).at(field.span())
    })
}

fn read_index(object: &Value, position: i64) -> Result<Value, Fault> {
    match object {
        Value::List(items) | Value::Tuple(items) => items
            .get(position)
            .cloned()
            .ok_or_else(|| out_of_range(position, items.len())),
        Value::Str(text) => {
            let len = text.chars().count();
            let resolved = if position < 0 {
                i64::try_from(len).ok().map(|len| len + position)
            } else {
                Some(position)
            };
            resolved
                .and_then(|index| usize::try_from(index).ok())
                .and_then(|index| text.chars().nth(index))
                .map(|ch| Value::Str(ch.to_string()))
                .ok_or_else(|| out_of_range(position, len))
        }
        other => Err(Fault::runtime(format!(
            "{} is not indexable",
            other.type_name()
        ))),
    }
}
