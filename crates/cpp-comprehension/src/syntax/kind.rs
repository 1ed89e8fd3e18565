use logos::Logos;

/// Token kinds as seen by the rest of the engine.
///
/// Most variants come straight out of the lexer; `IncludeStatement`,
/// `IncludePath` and `PreprocessorStatement` are synthesized by the
/// preprocessor while folding directive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Unknown,
    Whitespace,
    Comment,

    // Identifiers & literals
    Identifier,
    Integer,
    Float,
    DoubleQuotedString,
    SingleQuotedString,
    RawString,
    EscapeSequence,

    // Preprocessor (synthesized)
    IncludeStatement,
    IncludePath,
    PreprocessorStatement,

    // Punctuation
    Hash,
    HashHash,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Ellipsis,
    Arrow,
    ArrowStar,
    DotStar,
    ColonColon,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    AmpEqual,
    PipeEqual,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    LeftShift,
    RightShift,
    LeftShiftEqual,
    RightShiftEqual,

    // Keywords
    KwAlignas,
    KwAlignof,
    KwAsm,
    KwAuto,
    KwBool,
    KwBreak,
    KwCase,
    KwCatch,
    KwChar,
    KwChar8,
    KwChar16,
    KwChar32,
    KwClass,
    KwConst,
    KwConsteval,
    KwConstexpr,
    KwConstinit,
    KwContinue,
    KwDecltype,
    KwDefault,
    KwDelete,
    KwDo,
    KwDouble,
    KwDynamicCast,
    KwElse,
    KwEnum,
    KwExplicit,
    KwExport,
    KwExtern,
    KwFalse,
    KwFloat,
    KwFor,
    KwFriend,
    KwGoto,
    KwIf,
    KwInline,
    KwInt,
    KwLong,
    KwMutable,
    KwNamespace,
    KwNew,
    KwNoexcept,
    KwNullptr,
    KwOperator,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwRegister,
    KwReinterpretCast,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStaticAssert,
    KwStruct,
    KwSwitch,
    KwTemplate,
    KwThis,
    KwThreadLocal,
    KwThrow,
    KwTrue,
    KwTry,
    KwTypedef,
    KwTypeid,
    KwTypename,
    KwUnion,
    KwUnsigned,
    KwUsing,
    KwVirtual,
    KwVoid,
    KwVolatile,
    KwWchar,
    KwWhile,
}

/// Raw lexer tokens. Multi-char operators are listed before their
/// prefixes so `logos` prefers the longest match.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9][0-9']*([uUlLzZ]*)")]
    #[regex(r"0[xX][0-9a-fA-F']+[uUlL]*")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    Float,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleQuotedString,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleQuotedString,

    #[regex(r#"R"\(([^)]|\)[^"])*\)""#)]
    RawString,

    // A stray escape outside of a string literal.
    #[regex(r"\\.")]
    EscapeSequence,

    #[token("##")]
    HashHash,
    #[token("#")]
    Hash,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token("->*")]
    ArrowStar,
    #[token("->")]
    Arrow,
    #[token(".*")]
    DotStar,
    #[token(".")]
    Dot,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,

    #[token(">>=")]
    RightShiftEqual,
    #[token("<<=")]
    LeftShiftEqual,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    LeftShift,
    #[token(">>")]
    RightShift,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    #[token("alignas")]
    KwAlignas,
    #[token("alignof")]
    KwAlignof,
    #[token("asm")]
    KwAsm,
    #[token("auto")]
    KwAuto,
    #[token("bool")]
    KwBool,
    #[token("break")]
    KwBreak,
    #[token("case")]
    KwCase,
    #[token("catch")]
    KwCatch,
    #[token("char")]
    KwChar,
    #[token("char8_t")]
    KwChar8,
    #[token("char16_t")]
    KwChar16,
    #[token("char32_t")]
    KwChar32,
    #[token("class")]
    KwClass,
    #[token("const")]
    KwConst,
    #[token("consteval")]
    KwConsteval,
    #[token("constexpr")]
    KwConstexpr,
    #[token("constinit")]
    KwConstinit,
    #[token("continue")]
    KwContinue,
    #[token("decltype")]
    KwDecltype,
    #[token("default")]
    KwDefault,
    #[token("delete")]
    KwDelete,
    #[token("do")]
    KwDo,
    #[token("double")]
    KwDouble,
    #[token("dynamic_cast")]
    KwDynamicCast,
    #[token("else")]
    KwElse,
    #[token("enum")]
    KwEnum,
    #[token("explicit")]
    KwExplicit,
    #[token("export")]
    KwExport,
    #[token("extern")]
    KwExtern,
    #[token("false")]
    KwFalse,
    #[token("float")]
    KwFloat,
    #[token("for")]
    KwFor,
    #[token("friend")]
    KwFriend,
    #[token("goto")]
    KwGoto,
    #[token("if")]
    KwIf,
    #[token("inline")]
    KwInline,
    #[token("int")]
    KwInt,
    #[token("long")]
    KwLong,
    #[token("mutable")]
    KwMutable,
    #[token("namespace")]
    KwNamespace,
    #[token("new")]
    KwNew,
    #[token("noexcept")]
    KwNoexcept,
    #[token("nullptr")]
    KwNullptr,
    #[token("operator")]
    KwOperator,
    #[token("private")]
    KwPrivate,
    #[token("protected")]
    KwProtected,
    #[token("public")]
    KwPublic,
    #[token("register")]
    KwRegister,
    #[token("reinterpret_cast")]
    KwReinterpretCast,
    #[token("return")]
    KwReturn,
    #[token("short")]
    KwShort,
    #[token("signed")]
    KwSigned,
    #[token("sizeof")]
    KwSizeof,
    #[token("static")]
    KwStatic,
    #[token("static_assert")]
    KwStaticAssert,
    #[token("struct")]
    KwStruct,
    #[token("switch")]
    KwSwitch,
    #[token("template")]
    KwTemplate,
    #[token("this")]
    KwThis,
    #[token("thread_local")]
    KwThreadLocal,
    #[token("throw")]
    KwThrow,
    #[token("true")]
    KwTrue,
    #[token("try")]
    KwTry,
    #[token("typedef")]
    KwTypedef,
    #[token("typeid")]
    KwTypeid,
    #[token("typename")]
    KwTypename,
    #[token("union")]
    KwUnion,
    #[token("unsigned")]
    KwUnsigned,
    #[token("using")]
    KwUsing,
    #[token("virtual")]
    KwVirtual,
    #[token("void")]
    KwVoid,
    #[token("volatile")]
    KwVolatile,
    #[token("wchar_t")]
    KwWchar,
    #[token("while")]
    KwWhile,
}

impl From<LexKind> for TokenKind {
    fn from(kind: LexKind) -> Self {
        match kind {
            LexKind::Whitespace => TokenKind::Whitespace,
            LexKind::Comment => TokenKind::Comment,
            LexKind::Identifier => TokenKind::Identifier,
            LexKind::Integer => TokenKind::Integer,
            LexKind::Float => TokenKind::Float,
            LexKind::DoubleQuotedString => TokenKind::DoubleQuotedString,
            LexKind::SingleQuotedString => TokenKind::SingleQuotedString,
            LexKind::RawString => TokenKind::RawString,
            LexKind::EscapeSequence => TokenKind::EscapeSequence,
            LexKind::HashHash => TokenKind::HashHash,
            LexKind::Hash => TokenKind::Hash,
            LexKind::LParen => TokenKind::LParen,
            LexKind::RParen => TokenKind::RParen,
            LexKind::LBrace => TokenKind::LBrace,
            LexKind::RBrace => TokenKind::RBrace,
            LexKind::LBracket => TokenKind::LBracket,
            LexKind::RBracket => TokenKind::RBracket,
            LexKind::Semicolon => TokenKind::Semicolon,
            LexKind::Comma => TokenKind::Comma,
            LexKind::Ellipsis => TokenKind::Ellipsis,
            LexKind::ArrowStar => TokenKind::ArrowStar,
            LexKind::Arrow => TokenKind::Arrow,
            LexKind::DotStar => TokenKind::DotStar,
            LexKind::Dot => TokenKind::Dot,
            LexKind::ColonColon => TokenKind::ColonColon,
            LexKind::Colon => TokenKind::Colon,
            LexKind::Question => TokenKind::Question,
            LexKind::RightShiftEqual => TokenKind::RightShiftEqual,
            LexKind::LeftShiftEqual => TokenKind::LeftShiftEqual,
            LexKind::PlusPlus => TokenKind::PlusPlus,
            LexKind::MinusMinus => TokenKind::MinusMinus,
            LexKind::PlusEqual => TokenKind::PlusEqual,
            LexKind::MinusEqual => TokenKind::MinusEqual,
            LexKind::StarEqual => TokenKind::StarEqual,
            LexKind::SlashEqual => TokenKind::SlashEqual,
            LexKind::PercentEqual => TokenKind::PercentEqual,
            LexKind::AmpEqual => TokenKind::AmpEqual,
            LexKind::PipeEqual => TokenKind::PipeEqual,
            LexKind::CaretEqual => TokenKind::CaretEqual,
            LexKind::EqualEqual => TokenKind::EqualEqual,
            LexKind::NotEqual => TokenKind::NotEqual,
            LexKind::LessEqual => TokenKind::LessEqual,
            LexKind::GreaterEqual => TokenKind::GreaterEqual,
            LexKind::AndAnd => TokenKind::AndAnd,
            LexKind::OrOr => TokenKind::OrOr,
            LexKind::LeftShift => TokenKind::LeftShift,
            LexKind::RightShift => TokenKind::RightShift,
            LexKind::Plus => TokenKind::Plus,
            LexKind::Minus => TokenKind::Minus,
            LexKind::Star => TokenKind::Star,
            LexKind::Slash => TokenKind::Slash,
            LexKind::Percent => TokenKind::Percent,
            LexKind::Caret => TokenKind::Caret,
            LexKind::Amp => TokenKind::Amp,
            LexKind::Pipe => TokenKind::Pipe,
            LexKind::Tilde => TokenKind::Tilde,
            LexKind::Exclaim => TokenKind::Exclaim,
            LexKind::Equal => TokenKind::Equal,
            LexKind::Less => TokenKind::Less,
            LexKind::Greater => TokenKind::Greater,
            LexKind::KwAlignas => TokenKind::KwAlignas,
            LexKind::KwAlignof => TokenKind::KwAlignof,
            LexKind::KwAsm => TokenKind::KwAsm,
            LexKind::KwAuto => TokenKind::KwAuto,
            LexKind::KwBool => TokenKind::KwBool,
            LexKind::KwBreak => TokenKind::KwBreak,
            LexKind::KwCase => TokenKind::KwCase,
            LexKind::KwCatch => TokenKind::KwCatch,
            LexKind::KwChar => TokenKind::KwChar,
            LexKind::KwChar8 => TokenKind::KwChar8,
            LexKind::KwChar16 => TokenKind::KwChar16,
            LexKind::KwChar32 => TokenKind::KwChar32,
            LexKind::KwClass => TokenKind::KwClass,
            LexKind::KwConst => TokenKind::KwConst,
            LexKind::KwConsteval => TokenKind::KwConsteval,
            LexKind::KwConstexpr => TokenKind::KwConstexpr,
            LexKind::KwConstinit => TokenKind::KwConstinit,
            LexKind::KwContinue => TokenKind::KwContinue,
            LexKind::KwDecltype => TokenKind::KwDecltype,
            LexKind::KwDefault => TokenKind::KwDefault,
            LexKind::KwDelete => TokenKind::KwDelete,
            LexKind::KwDo => TokenKind::KwDo,
            LexKind::KwDouble => TokenKind::KwDouble,
            LexKind::KwDynamicCast => TokenKind::KwDynamicCast,
            LexKind::KwElse => TokenKind::KwElse,
            LexKind::KwEnum => TokenKind::KwEnum,
            LexKind::KwExplicit => TokenKind::KwExplicit,
            LexKind::KwExport => TokenKind::KwExport,
            LexKind::KwExtern => TokenKind::KwExtern,
            LexKind::KwFalse => TokenKind::KwFalse,
            LexKind::KwFloat => TokenKind::KwFloat,
            LexKind::KwFor => TokenKind::KwFor,
            LexKind::KwFriend => TokenKind::KwFriend,
            LexKind::KwGoto => TokenKind::KwGoto,
            LexKind::KwIf => TokenKind::KwIf,
            LexKind::KwInline => TokenKind::KwInline,
            LexKind::KwInt => TokenKind::KwInt,
            LexKind::KwLong => TokenKind::KwLong,
            LexKind::KwMutable => TokenKind::KwMutable,
            LexKind::KwNamespace => TokenKind::KwNamespace,
            LexKind::KwNew => TokenKind::KwNew,
            LexKind::KwNoexcept => TokenKind::KwNoexcept,
            LexKind::KwNullptr => TokenKind::KwNullptr,
            LexKind::KwOperator => TokenKind::KwOperator,
            LexKind::KwPrivate => TokenKind::KwPrivate,
            LexKind::KwProtected => TokenKind::KwProtected,
            LexKind::KwPublic => TokenKind::KwPublic,
            LexKind::KwRegister => TokenKind::KwRegister,
            LexKind::KwReinterpretCast => TokenKind::KwReinterpretCast,
            LexKind::KwReturn => TokenKind::KwReturn,
            LexKind::KwShort => TokenKind::KwShort,
            LexKind::KwSigned => TokenKind::KwSigned,
            LexKind::KwSizeof => TokenKind::KwSizeof,
            LexKind::KwStatic => TokenKind::KwStatic,
            LexKind::KwStaticAssert => TokenKind::KwStaticAssert,
            LexKind::KwStruct => TokenKind::KwStruct,
            LexKind::KwSwitch => TokenKind::KwSwitch,
            LexKind::KwTemplate => TokenKind::KwTemplate,
            LexKind::KwThis => TokenKind::KwThis,
            LexKind::KwThreadLocal => TokenKind::KwThreadLocal,
            LexKind::KwThrow => TokenKind::KwThrow,
            LexKind::KwTrue => TokenKind::KwTrue,
            LexKind::KwTry => TokenKind::KwTry,
            LexKind::KwTypedef => TokenKind::KwTypedef,
            LexKind::KwTypeid => TokenKind::KwTypeid,
            LexKind::KwTypename => TokenKind::KwTypename,
            LexKind::KwUnion => TokenKind::KwUnion,
            LexKind::KwUnsigned => TokenKind::KwUnsigned,
            LexKind::KwUsing => TokenKind::KwUsing,
            LexKind::KwVirtual => TokenKind::KwVirtual,
            LexKind::KwVoid => TokenKind::KwVoid,
            LexKind::KwVolatile => TokenKind::KwVolatile,
            LexKind::KwWchar => TokenKind::KwWchar,
            LexKind::KwWhile => TokenKind::KwWhile,
        }
    }
}
