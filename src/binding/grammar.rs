//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::*;
use super::lexer::Token;
use crate::error::BindingError;

/// Parse dynamic text into literal runs and bindings
pub fn parse(input: &str) -> Result<DynamicText, Vec<BindingError>> {
    let len = input.len();

    let token_iter = super::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    dynamic_text_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Split the inside of `{...}` into a binding.
///
/// The last `.` separates the property; a `:` before it separates kind from
/// target. Project bindings have no target.
fn binding_from_raw(raw: &str) -> Result<Binding, String> {
    let (head, property) = raw
        .rsplit_once('.')
        .ok_or_else(|| format!("binding '{{{raw}}}' has no property; expected '<kind>:<name>.<property>' or 'project.<property>'"))?;

    let (kind, target) = match head.split_once(':') {
        Some((kind, target)) => (kind.trim(), Some(target.trim())),
        None => (head.trim(), None),
    };

    let kind = BindingKind::parse(kind).ok_or_else(|| {
        format!("unknown binding kind '{kind}'; expected one of: mapFrame, project, layout")
    })?;

    let target = match (kind.takes_target(), target) {
        (true, Some(name)) if !name.is_empty() => Some(name.to_string()),
        (true, _) => return Err(format!("'{kind}' bindings need a name: {{{kind}:<name>.<property>}}")),
        (false, Some(_)) => return Err(format!("'{kind}' bindings take no name: {{{kind}.<property>}}")),
        (false, None) => None,
    };

    let property = property.trim();
    let expected = kind
        .properties()
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let property = BindingProperty::parse(property)
        .filter(|p| kind.properties().contains(p))
        .ok_or_else(|| {
            format!("'{property}' is not a {kind} property. Expected one of: {expected}")
        })?;

    Ok(Binding {
        kind,
        target,
        property,
    })
}

fn dynamic_text_parser<'a, I>() -> impl Parser<'a, I, DynamicText, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let text_piece = select! {
        Token::Text(s) => s,
        Token::Colon => ":".to_string(),
        Token::Dot => ".".to_string(),
    }
    .labelled("text");

    let binding = text_piece
        .clone()
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .try_map(|parts, span: SimpleSpan| {
            binding_from_raw(&parts.concat()).map_err(|msg| Rich::custom(span, msg))
        })
        .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
        .map(Segment::Binding);

    let literal = text_piece
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|parts| Segment::Literal(parts.concat()));

    choice((binding, literal))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|segments| DynamicText { segments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_map_frame_binding() {
        let text = parse("{mapFrame:Core Map Frame.mapName}").unwrap();
        assert_eq!(
            text.segments,
            vec![Segment::Binding(Binding::map_frame(
                "Core Map Frame",
                BindingProperty::MapName
            ))]
        );
    }

    #[test]
    fn test_parse_mixed_literal_and_bindings() {
        let text = parse("Project: {project.name} (1:24,000.)").unwrap();
        assert_eq!(
            text.segments,
            vec![
                Segment::Literal("Project: ".to_string()),
                Segment::Binding(Binding::project(BindingProperty::Name)),
                Segment::Literal(" (1:24,000.)".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_layout_credits() {
        let text = parse("{layout:Landscape Layout with Inset.serviceLayerCredits}").unwrap();
        assert_eq!(
            text.bindings().next(),
            Some(&Binding::layout(
                "Landscape Layout with Inset",
                BindingProperty::ServiceLayerCredits
            ))
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse("").unwrap(), DynamicText::default());
    }

    #[test]
    fn test_unknown_property_rejected() {
        let errs = parse("{mapFrame:Core Map Frame.title}").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].to_string().contains("'title' is not a mapFrame property"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let errs = parse("{table:Core.name}").unwrap_err();
        assert!(errs[0].to_string().contains("unknown binding kind 'table'"));
    }

    #[test]
    fn test_project_takes_no_name() {
        assert!(parse("{project:Mine.name}").is_err());
        assert!(parse("{mapFrame.mapName}").is_err());
    }

    #[test]
    fn test_unclosed_brace() {
        let errs = parse("Title {project.name").unwrap_err();
        assert!(errs[0].span().start >= 6);
    }

    #[test]
    fn test_stray_close_brace() {
        assert!(parse("oops}").is_err());
    }

    #[test]
    fn test_display_reproduces_source() {
        let source = "Map: {mapFrame:Inset Map Frame.mapName}!";
        assert_eq!(parse(source).unwrap().to_string(), source);
    }
}
