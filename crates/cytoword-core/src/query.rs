//! SPARQL text for the Wikidata lookups.

pub const VAR_GENE_SYMBOL: &str = "gene_symbol";
pub const VAR_ARTICLE: &str = "article";
pub const VAR_SCORE: &str = "score";

const ENGLISH_WIKIPEDIA_PREFIX: &str = "https://en.wikipedia.org/";

/// English Wikipedia article per symbol, preferring the gene's article and
/// falling back to the encoded protein's. Symbols with no article still
/// come back unbound; symbols with no item do not come back at all.
#[must_use]
pub fn article_query<S: AsRef<str>>(symbols: &[S]) -> String {
    let values = symbols
        .iter()
        .map(|symbol| string_literal(symbol.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX schema: <http://schema.org/>
SELECT DISTINCT ?{VAR_GENE_SYMBOL} ?{VAR_ARTICLE} WHERE {{
  VALUES ?{VAR_GENE_SYMBOL} {{ {values} }}
  ?item wdt:P353 ?{VAR_GENE_SYMBOL} .
  ?item wdt:P688 ?protein .
  OPTIONAL {{
    ?article_gene schema:about ?item ;
                  schema:inLanguage "en" .
    FILTER (STRSTARTS(STR(?article_gene), "{ENGLISH_WIKIPEDIA_PREFIX}"))
  }}
  OPTIONAL {{
    ?article_protein schema:about ?protein ;
                     schema:inLanguage "en" .
    FILTER (STRSTARTS(STR(?article_protein), "{ENGLISH_WIKIPEDIA_PREFIX}"))
  }}
  BIND(COALESCE(?article_gene, ?article_protein) AS ?{VAR_ARTICLE})
}}
"#
    )
}

/// Every gene symbol with an encoded protein, most-linked first.
#[must_use]
pub fn ranked_symbols_query() -> String {
    format!(
        r#"PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX wikibase: <http://wikiba.se/ontology#>
SELECT DISTINCT ?item ?{VAR_GENE_SYMBOL} ?protein ?sitelink_gene ?sitelink_protein ?{VAR_SCORE} WHERE {{
  ?item wdt:P353 ?{VAR_GENE_SYMBOL} .
  ?item wdt:P688 ?protein .
  ?item wikibase:sitelinks ?sitelink_gene .
  ?protein wikibase:sitelinks ?sitelink_protein .
  BIND(2.5 * ?sitelink_gene + ?sitelink_protein AS ?{VAR_SCORE})
}}
ORDER BY DESC(?{VAR_SCORE})
"#
    )
}

fn string_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
