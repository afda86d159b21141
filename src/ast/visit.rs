//! Read-only traversal of the typed tree.
//!
//! Implement [`Visitor`] and override only the methods you need; call the
//! matching `walk_*` function inside an override to keep recursing, or omit
//! it to prune traversal at that node. The default methods reach every child
//! of every node, so a resolver or translator can be written once against
//! this trait.
//!
//! ```
//! use gofront::ast::{ast::Identifier, visit::{walk_identifier, Visitor}};
//!
//! struct Names(Vec<String>);
//!
//! impl Visitor for Names {
//!     fn visit_identifier(&mut self, identifier: &Identifier) {
//!         self.0.push(identifier.name.clone());
//!         walk_identifier(self, identifier);
//!     }
//! }
//!
//! let program = gofront::parse("var a, b number = 1, 2;").unwrap();
//! let mut names = Names(vec![]);
//! names.visit_program(&program);
//! assert_eq!(names.0, vec!["a", "b"]);
//! ```

use super::{
    ast::{Expr, Identifier, Program, Stmt, TopLevel},
    expressions::FunctionNode,
    statements::{AssignTarget, CommStatement, Declaration, ElseBranch, IfStatement, SelectArm},
    types::Type,
};

pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_top_level(&mut self, item: &TopLevel) {
        walk_top_level(self, item);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &Type) {
        walk_type(self, ty);
    }

    fn visit_identifier(&mut self, identifier: &Identifier) {
        walk_identifier(self, identifier);
    }

    fn visit_function(&mut self, function: &FunctionNode) {
        walk_function(self, function);
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        walk_declaration(self, declaration);
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for item in &program.top_declarations {
        visitor.visit_top_level(item);
    }
}

pub fn walk_top_level<V: Visitor>(visitor: &mut V, item: &TopLevel) {
    match item {
        TopLevel::Declaration(declaration) => visitor.visit_declaration(declaration),
        TopLevel::Function(function) => visitor.visit_function(function),
        TopLevel::TypeDeclaration(declaration) => visitor.visit_type(&declaration.dec_type),
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, body: &[Stmt]) {
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Declaration(declaration) => visitor.visit_declaration(declaration),
        Stmt::Expression(statement) => visitor.visit_expr(&statement.expression),
        Stmt::Return(statement) => {
            for expr in &statement.expressions {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Assignment(statement) => {
            for target in &statement.ids {
                match target {
                    AssignTarget::Identifier(identifier) => visitor.visit_identifier(identifier),
                    AssignTarget::IndexAccess(access) => {
                        visitor.visit_expr(&access.accessed);
                        visitor.visit_expr(&access.index);
                    }
                }
            }
            for expr in &statement.vals {
                visitor.visit_expr(expr);
            }
        }
        Stmt::If(statement) => walk_if(visitor, statement),
        Stmt::For(statement) => {
            if let Some(init) = &statement.init {
                visitor.visit_stmt(init);
            }
            if let Some(cond) = &statement.cond {
                visitor.visit_expr(cond);
            }
            if let Some(post) = &statement.post {
                visitor.visit_stmt(post);
            }
            walk_block(visitor, &statement.body);
        }
        Stmt::Go(statement) => {
            visitor.visit_expr(&statement.app.operator);
            for operand in &statement.app.operands {
                visitor.visit_expr(operand);
            }
        }
        Stmt::Select(statement) => {
            for arm in &statement.cases {
                match arm {
                    SelectArm::Case(case) => {
                        match &case.statement {
                            CommStatement::Send(send) => {
                                visitor.visit_expr(&send.chan);
                                visitor.visit_expr(&send.val);
                            }
                            CommStatement::Receive(receive) => visitor.visit_expr(&receive.chan),
                            CommStatement::Declaration(declaration) => {
                                visitor.visit_declaration(declaration)
                            }
                            CommStatement::Assignment(assignment) => {
                                walk_stmt(visitor, &Stmt::Assignment(assignment.clone()))
                            }
                        }
                        walk_block(visitor, &case.body);
                    }
                    SelectArm::Default(default) => walk_block(visitor, &default.body),
                }
            }
        }
        Stmt::Send(statement) => {
            visitor.visit_expr(&statement.chan);
            visitor.visit_expr(&statement.val);
        }
        Stmt::Empty => {}
        Stmt::Function(function) => visitor.visit_function(function),
        Stmt::TypeDeclaration(declaration) => visitor.visit_type(&declaration.dec_type),
    }
}

fn walk_if<V: Visitor>(visitor: &mut V, statement: &IfStatement) {
    if let Some(short) = &statement.short {
        visitor.visit_stmt(short);
    }
    visitor.visit_expr(&statement.cond);
    walk_block(visitor, &statement.cons);
    match &statement.alt {
        Some(ElseBranch::Block(body)) => walk_block(visitor, body),
        Some(ElseBranch::If(nested)) => walk_if(visitor, nested),
        None => {}
    }
}

pub fn walk_declaration<V: Visitor>(visitor: &mut V, declaration: &Declaration) {
    for identifier in &declaration.ids {
        visitor.visit_identifier(identifier);
    }
    for expr in &declaration.vals {
        visitor.visit_expr(expr);
    }
}

pub fn walk_function<V: Visitor>(visitor: &mut V, function: &FunctionNode) {
    if let Some(name) = &function.name {
        visitor.visit_identifier(name);
    }
    for formal in &function.formals {
        visitor.visit_identifier(formal);
    }
    if let Some(ret_type) = &function.ret_type {
        visitor.visit_type(ret_type);
    }
    walk_block(visitor, &function.body);
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Identifier(identifier) => visitor.visit_identifier(identifier),
        Expr::Literal(literal) => visitor.visit_type(&literal.val_type),
        Expr::Application(application) => {
            visitor.visit_expr(&application.operator);
            for operand in &application.operands {
                visitor.visit_expr(operand);
            }
        }
        Expr::UnOp(op) => visitor.visit_expr(&op.expr),
        Expr::BinOp(op) => {
            visitor.visit_expr(&op.left);
            visitor.visit_expr(&op.right);
        }
        Expr::IndexAccess(access) => {
            visitor.visit_expr(&access.accessed);
            visitor.visit_expr(&access.index);
        }
        Expr::Function(function) => visitor.visit_function(function),
        Expr::StructLiteral(literal) => {
            visitor.visit_type(&literal.val_type);
            for field in &literal.fields {
                visitor.visit_identifier(&field.field);
                visitor.visit_expr(&field.expr);
            }
        }
        Expr::StructAccess(access) => {
            visitor.visit_expr(&access.accessed);
            visitor.visit_identifier(&access.field);
        }
        Expr::Receive(receive) => visitor.visit_expr(&receive.chan),
    }
}

pub fn walk_identifier<V: Visitor>(visitor: &mut V, identifier: &Identifier) {
    if let Some(val_type) = &identifier.val_type {
        visitor.visit_type(val_type);
    }
}

pub fn walk_type<V: Visitor>(visitor: &mut V, ty: &Type) {
    match ty {
        Type::Any | Type::Void | Type::Basic(_) | Type::Custom(_) => {}
        Type::Tuple(elements) => {
            for element in elements {
                visitor.visit_type(element);
            }
        }
        Type::Function { params, ret } => {
            visitor.visit_type(params);
            visitor.visit_type(ret);
        }
        Type::Chan { element, .. } | Type::Array { element, .. } | Type::Slice(element) => {
            visitor.visit_type(element)
        }
        Type::Struct(elems) => {
            for elem in elems {
                visitor.visit_identifier(&elem.name);
            }
        }
    }
}
