use nfce_reader::{
    is_valid, DocumentOptions, FiscalDocument, LookupError, ParseError, ProductLocator, ABSENT,
};

const FIXTURE: &str = include_str!("fixtures/nfce_35200714200166000187550010000000046100000043.xml");
const KEY: &str = "35200714200166000187550010000000046100000043";

fn load(options: &DocumentOptions) -> FiscalDocument {
    FiscalDocument::parse(FIXTURE, "nfce.xml", options).unwrap()
}

/// 實際格式的 NFC-e：帶 BOM、預設 namespace、三個品項
#[test]
fn test_real_document_key_and_items() {
    let doc = load(&DocumentOptions::default());
    assert_eq!(doc.access_key(), KEY);
    assert!(is_valid(doc.access_key()));

    let locator = ProductLocator::default();
    assert_eq!(locator.item_count(&doc), 3);

    let first = locator.find_product(&doc, 1).unwrap();
    assert_eq!(first.code, "7891000100103");
    assert_eq!(first.description, "LEITE CONDENSADO 395G");
    assert_eq!(first.ncm, "04029900");
    assert_eq!(first.cfop, "5102");

    let second = locator.find_product(&doc, 2).unwrap();
    assert_eq!(second.ncm, "19059090");
    assert_eq!(second.cfop, "5405");
}

#[test]
fn test_empty_and_missing_fields_surface_as_sentinel() {
    let doc = load(&DocumentOptions::default());
    let third = ProductLocator::default().find_product(&doc, 3).unwrap();

    assert_eq!(third.code, "SACOLA");
    assert_eq!(third.ncm, ABSENT);
    assert_eq!(third.cfop, ABSENT);
    assert_ne!(third.cfop, "");
}

#[test]
fn test_out_of_range_ordinals() {
    let doc = load(&DocumentOptions::default());
    let locator = ProductLocator::default();

    for ordinal in [0, -3, 4, 100] {
        assert_eq!(
            locator.find_product(&doc, ordinal),
            Err(LookupError::NotFound {
                ordinal,
                available: 3
            })
        );
    }
}

#[test]
fn test_parsing_twice_gives_same_results() {
    let a = load(&DocumentOptions::default());
    let b = load(&DocumentOptions::default());
    let locator = ProductLocator::default();

    assert_eq!(a.access_key(), b.access_key());
    for ordinal in 1..=3 {
        assert_eq!(
            locator.find_product(&a, ordinal),
            locator.find_product(&b, ordinal)
        );
    }
}

#[test]
fn test_unknown_namespace_falls_back_to_local_names() {
    let text = FIXTURE.replace("http://www.portalfiscal.inf.br/nfe", "urn:somewhere-else");
    let doc = FiscalDocument::parse(&text, "other-ns.xml", &DocumentOptions::default()).unwrap();

    assert_eq!(doc.access_key(), KEY);
    let product = ProductLocator::default().find_product(&doc, 2).unwrap();
    assert_eq!(product.code, "000123");
}

#[test]
fn test_loose_namespace_variant_is_configurable() {
    let text = FIXTURE.replace("http://www.portalfiscal.inf.br/nfe", "www.portalfiscal.inf.br");
    let options = DocumentOptions {
        namespaces: vec!["www.portalfiscal.inf.br".to_string()],
        ..DocumentOptions::default()
    };

    let doc = FiscalDocument::parse(&text, "loose.xml", &options).unwrap();
    let product = ProductLocator::new(options).find_product(&doc, 1).unwrap();
    assert_eq!(product.cfop, "5102");
}

#[test]
fn test_strict_options_on_real_document() {
    let options = DocumentOptions {
        strict_id_prefix: true,
        require_nested_prod: true,
        ..DocumentOptions::default()
    };
    let doc = load(&options);

    assert!(ProductLocator::new(options).find_product(&doc, 3).is_ok());
}

#[test]
fn test_truncated_document_is_malformed() {
    let truncated = &FIXTURE[..FIXTURE.len() / 2];
    let err = FiscalDocument::parse(truncated, "cut.xml", &DocumentOptions::default()).unwrap_err();
    assert!(matches!(err, ParseError::Malformed(_)));
}
