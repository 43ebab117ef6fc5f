use serde::{Deserialize, Serialize};

use super::Expression;

/// A function or lambda parameter. The declared type is purely syntactic and
/// never enforced at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub declared_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    VarDeclaration {
        name: String,
        declared_type: Option<String>,
        value: Expression,
    },
    Assignment {
        name: String,
        value: Expression,
    },
    FunctionDeclaration {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
        body: Vec<Statement>,
    },
    Return {
        value: Expression,
    },
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    For {
        iterator: String,
        iterable: Expression,
        body: Vec<Statement>,
    },
    TryCatch {
        try_body: Vec<Statement>,
        catch_name: String,
        catch_body: Vec<Statement>,
    },
    Throw {
        value: Expression,
    },
    Print {
        arguments: Vec<Expression>,
    },
    Expression(Expression),
}
