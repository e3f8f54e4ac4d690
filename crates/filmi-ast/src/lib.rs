pub mod loc {
    use serde::Serialize;

    /// A 1-based source position. Tokens carry a full `Loc`; AST nodes keep
    /// only the line of their first token.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Loc {
        pub line: u32,
        pub column: u32,
    }

    impl Loc {
        #[must_use]
        pub const fn new(line: u32, column: u32) -> Self {
            Self { line, column }
        }
    }

    impl std::fmt::Display for Loc {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Line {}, Column {}", self.line, self.column)
        }
    }
}

pub mod ast {
    use serde::Serialize;

    /// A whole source file: the statements between the program-start and
    /// program-end keywords.
    #[derive(Debug, Serialize)]
    pub struct Program {
        pub stmts: Vec<Stmt>,
    }

    /// Statement list inside `{ ... }`, a conditional branch, a loop body,
    /// or a function body. The construct that owns the block decides when a
    /// new scope is pushed, so `Block` itself is just the statement list.
    #[derive(Debug, Clone, Serialize)]
    pub struct Block {
        pub stmts: Vec<Stmt>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Stmt {
        /// `maan lo name = expr`
        VarDecl { name: String, init: Expr, line: u32 },
        /// `name = expr` at statement position
        Assign { name: String, value: Expr, line: u32 },
        /// `ek baat bataun: expr, expr, ...` — one output line per statement
        Print { args: Vec<Expr>, line: u32 },
        /// `agar kismat rahi (c0) {..} nahi to (c1) {..} ... warna {..}`
        ///
        /// `conds` and `branches` are parallel and never empty.
        If {
            conds: Vec<Expr>,
            branches: Vec<Block>,
            alt: Option<Block>,
            line: u32,
        },
        /// `jab tak hai jaan (cond) { ... }`
        While { cond: Expr, body: Block, line: u32 },
        /// `me bahar ja raha hu`
        Break { line: u32 },
        /// `climax name(p, q) { ... }`
        FuncDecl {
            name: String,
            params: Vec<String>,
            body: Block,
            line: u32,
        },
        /// `dialogue wapas do expr?`
        Return { value: Option<Expr>, line: u32 },
        /// Bare expression evaluated for effect
        Expr { expr: Expr, line: u32 },
        /// A free-standing `{ ... }`, which opens its own scope
        Block { block: Block, line: u32 },
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum Expr {
        Literal {
            value: Lit,
            line: u32,
        },
        Ident {
            name: String,
            line: u32,
        },
        /// `name = expr` in expression position; evaluates to the assigned value
        Assign {
            name: String,
            value: Box<Expr>,
            line: u32,
        },
        Unary {
            op: UnOp,
            operand: Box<Expr>,
            line: u32,
        },
        Binary {
            op: BinOp,
            lhs: Box<Expr>,
            rhs: Box<Expr>,
            line: u32,
        },
        /// The callee is a bare name, never an arbitrary expression.
        Call {
            callee: String,
            args: Vec<Expr>,
            line: u32,
        },
        Grouping {
            inner: Box<Expr>,
            line: u32,
        },
    }

    impl Expr {
        /// Line of the expression's first token
        #[must_use]
        pub fn line(&self) -> u32 {
            match self {
                Expr::Literal { line, .. }
                | Expr::Ident { line, .. }
                | Expr::Assign { line, .. }
                | Expr::Unary { line, .. }
                | Expr::Binary { line, .. }
                | Expr::Call { line, .. }
                | Expr::Grouping { line, .. } => *line,
            }
        }
    }

    impl Stmt {
        /// Line of the statement's first token
        #[must_use]
        pub fn line(&self) -> u32 {
            match self {
                Stmt::VarDecl { line, .. }
                | Stmt::Assign { line, .. }
                | Stmt::Print { line, .. }
                | Stmt::If { line, .. }
                | Stmt::While { line, .. }
                | Stmt::Break { line }
                | Stmt::FuncDecl { line, .. }
                | Stmt::Return { line, .. }
                | Stmt::Expr { line, .. }
                | Stmt::Block { line, .. } => *line,
            }
        }
    }

    /// Literal values in the source code
    #[derive(Debug, Clone, Serialize)]
    pub enum Lit {
        /// All numbers are one floating type; there is no integer type.
        Num(f64),
        Str(String),
        Bool(bool),
        /// The `khaali` literal — the language's null.
        Unit,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Not,
        Neg,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // logical
        Or,
        And,
        // equality
        Eq,
        Ne,
        // relational
        Lt,
        Le,
        Gt,
        Ge,
        // arithmetic
        Add,
        Sub,
        Mul,
        Div,
        Rem,
    }

    impl BinOp {
        /// The operator's surface spelling, used in runtime diagnostics.
        #[must_use]
        pub const fn symbol(self) -> &'static str {
            match self {
                BinOp::Or => "||",
                BinOp::And => "&&",
                BinOp::Eq => "==",
                BinOp::Ne => "!=",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Rem => "%",
            }
        }
    }
}
