use crate::syntax::kind::TokenKind;

/// Keywords naming builtin types. These classify as `Type` in semantic
/// token output, everything else in `is_keyword` classifies as `Keyword`.
pub fn is_known_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwVoid
            | TokenKind::KwBool
            | TokenKind::KwChar
            | TokenKind::KwChar8
            | TokenKind::KwChar16
            | TokenKind::KwChar32
            | TokenKind::KwWchar
            | TokenKind::KwShort
            | TokenKind::KwInt
            | TokenKind::KwLong
            | TokenKind::KwFloat
            | TokenKind::KwDouble
            | TokenKind::KwSigned
            | TokenKind::KwUnsigned
            | TokenKind::KwAuto
    )
}

pub fn is_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwAlignas
            | TokenKind::KwAlignof
            | TokenKind::KwAsm
            | TokenKind::KwAuto
            | TokenKind::KwBool
            | TokenKind::KwBreak
            | TokenKind::KwCase
            | TokenKind::KwCatch
            | TokenKind::KwChar
            | TokenKind::KwChar8
            | TokenKind::KwChar16
            | TokenKind::KwChar32
            | TokenKind::KwClass
            | TokenKind::KwConst
            | TokenKind::KwConsteval
            | TokenKind::KwConstexpr
            | TokenKind::KwConstinit
            | TokenKind::KwContinue
            | TokenKind::KwDecltype
            | TokenKind::KwDefault
            | TokenKind::KwDelete
            | TokenKind::KwDo
            | TokenKind::KwDouble
            | TokenKind::KwDynamicCast
            | TokenKind::KwElse
            | TokenKind::KwEnum
            | TokenKind::KwExplicit
            | TokenKind::KwExport
            | TokenKind::KwExtern
            | TokenKind::KwFalse
            | TokenKind::KwFloat
            | TokenKind::KwFor
            | TokenKind::KwFriend
            | TokenKind::KwGoto
            | TokenKind::KwIf
            | TokenKind::KwInline
            | TokenKind::KwInt
            | TokenKind::KwLong
            | TokenKind::KwMutable
            | TokenKind::KwNamespace
            | TokenKind::KwNew
            | TokenKind::KwNoexcept
            | TokenKind::KwNullptr
            | TokenKind::KwOperator
            | TokenKind::KwPrivate
            | TokenKind::KwProtected
            | TokenKind::KwPublic
            | TokenKind::KwRegister
            | TokenKind::KwReinterpretCast
            | TokenKind::KwReturn
            | TokenKind::KwShort
            | TokenKind::KwSigned
            | TokenKind::KwSizeof
            | TokenKind::KwStatic
            | TokenKind::KwStaticAssert
            | TokenKind::KwStruct
            | TokenKind::KwSwitch
            | TokenKind::KwTemplate
            | TokenKind::KwThis
            | TokenKind::KwThreadLocal
            | TokenKind::KwThrow
            | TokenKind::KwTrue
            | TokenKind::KwTry
            | TokenKind::KwTypedef
            | TokenKind::KwTypeid
            | TokenKind::KwTypename
            | TokenKind::KwUnion
            | TokenKind::KwUnsigned
            | TokenKind::KwUsing
            | TokenKind::KwVirtual
            | TokenKind::KwVoid
            | TokenKind::KwVolatile
            | TokenKind::KwWchar
            | TokenKind::KwWhile
    )
}

/// Qualifiers that may precede a type in a declaration.
pub fn is_declaration_qualifier(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwConst
            | TokenKind::KwConstexpr
            | TokenKind::KwStatic
            | TokenKind::KwInline
            | TokenKind::KwVirtual
            | TokenKind::KwExtern
            | TokenKind::KwMutable
            | TokenKind::KwExplicit
            | TokenKind::KwFriend
            | TokenKind::KwVolatile
    )
}

pub fn is_string(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::DoubleQuotedString | TokenKind::SingleQuotedString | TokenKind::RawString
    )
}

/// Operators that may join two expression operands.
pub fn is_binary_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Caret
            | TokenKind::Amp
            | TokenKind::Pipe
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::EqualEqual
            | TokenKind::NotEqual
            | TokenKind::LessEqual
            | TokenKind::GreaterEqual
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::LeftShift
            | TokenKind::RightShift
    )
}
