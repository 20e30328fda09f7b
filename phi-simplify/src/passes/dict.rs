use crate::{
    expr::{BinOp, Expr, Literal},
    pass::{rewrite_bottom_up, Pass, PassContext},
    step::Step,
};

/// Returns the literal keys of the entries, or [`None`] if any key is not a literal.
fn literal_keys(entries: &[(Expr, Expr)]) -> Option<Vec<&Literal>> {
    entries
        .iter()
        .map(|(key, _)| match key {
            Expr::Literal(literal) => Some(literal),
            _ => None,
        })
        .collect()
}

/// `{k1: a} | {k2: b} = {k1: a, k2: b}`
///
/// Both dictionaries must have only literal keys. When a key appears more than once, the value
/// given last wins, and the entry stays at the position where the key first appeared. Keys are
/// compared by value, so `1` and `1.0` are the same key.
pub fn merge_dicts(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::Binary { op: BinOp::BitOr, lhs, rhs } = expr else {
        return None;
    };
    let (Expr::Dict(left), Expr::Dict(right)) = (&**lhs, &**rhs) else {
        return None;
    };
    let keys = literal_keys(left)?.into_iter().chain(literal_keys(right)?);
    let values = left.iter().chain(right).map(|(_, value)| value);

    let mut merged: Vec<(Literal, Expr)> = Vec::new();
    for (key, value) in keys.zip(values) {
        match merged.iter_mut().find(|(existing, _)| existing.loose_eq(key)) {
            Some((_, slot)) => *slot = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }

    ctx.push(Step::DictMerge);
    Some(Expr::Dict(
        merged.into_iter().map(|(key, value)| (Expr::Literal(key), value)).collect(),
    ))
}

/// `{k: v}[k] = v`
///
/// A literal key selects the last entry with an equal literal key. A name selects the first
/// entry whose key is the same name, which allows symbolic lookups such as `{i: 1}[i]` before `i`
/// is known.
pub fn lookup_dict(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::Subscript { target, key } = expr else {
        return None;
    };
    let Expr::Dict(entries) = &**target else {
        return None;
    };

    let value = match &**key {
        Expr::Literal(key) => entries
            .iter()
            .rev()
            .find(|(candidate, _)| matches!(candidate, Expr::Literal(lit) if lit.loose_eq(key)))
            .map(|(_, value)| value),
        Expr::Ident(name) => entries
            .iter()
            .find(|(candidate, _)| candidate.is_ident(name))
            .map(|(_, value)| value),
        _ => None,
    }?;

    ctx.push(Step::DictLookup);
    Some(value.clone())
}

/// Merges dictionary literals joined by `|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictMergeFolder;

impl Pass for DictMergeFolder {
    fn name(&self) -> &'static str {
        "dict_merge_folder"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &merge_dicts)
    }
}

/// Replaces subscripts of dictionary literals with the selected value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DictLookupFolder;

impl Pass for DictLookupFolder {
    fn name(&self) -> &'static str {
        "dict_lookup_folder"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &lookup_dict)
    }
}
