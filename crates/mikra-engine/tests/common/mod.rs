use mikra_core::model::{
    Content, HistoryRecord, Index, Link, Note, Numbering, OutlineNode, RefState, Sheet, SheetNode,
    TranslationRequest, Version,
};
use mikra_core::ops::Library;

/// Node of leaf segments
#[allow(dead_code)]
pub fn leaf_section(texts: &[&str]) -> Content {
    Content::node(texts.iter().map(|t| Content::leaf(*t)).collect())
}

/// Node of `count` numbered leaf segments ("s1", "s2", ...)
#[allow(dead_code)]
pub fn numbered_segments(prefix: &str, count: usize) -> Content {
    Content::node(
        (1..=count)
            .map(|i| Content::leaf(format!("{}{}", prefix, i)))
            .collect(),
    )
}

/// Comment groups: `count` empty groups with overrides at 1-based positions
#[allow(dead_code)]
pub fn comment_groups(count: usize, filled: &[(usize, &[&str])]) -> Content {
    let mut groups: Vec<Content> = (0..count).map(|_| Content::empty_node()).collect();
    for (pos, comments) in filled {
        groups[pos - 1] = Content::node(comments.iter().map(|c| Content::leaf(*c)).collect());
    }
    Content::node(groups)
}

/// Folio-book content populated at one linearized top-level section
#[allow(dead_code)]
pub fn folio_content(linear: u32, section: Content) -> Content {
    let mut tops: Vec<Content> = (0..linear as usize).map(|_| Content::empty_node()).collect();
    tops[linear as usize - 1] = section;
    Content::node(tops)
}

/// Fixture around Shabbat 45b (linear section 90) with two base editions,
/// two Rashi editions, and one dependent record of every kind.
///
/// The merged comment-section length of Rashi at 45b:11 is 2 (one edition
/// has one comment there, the other has two).
#[allow(dead_code)]
pub fn shabbat_library() -> Library {
    let mut lib = Library::new();

    lib.add_index(
        Index::new(
            "Shabbat",
            vec!["Talmud".to_string()],
            vec!["Daf".to_string(), "Line".to_string()],
            Numbering::Folio,
        )
        .with_declared_length(157),
    )
    .unwrap();
    let shabbat = lib.get_index("Shabbat").unwrap().clone();
    lib.add_index(Index::commentary("Rashi on Shabbat", &shabbat))
        .unwrap();
    lib.add_index(Index::new(
        "Genesis",
        vec!["Tanakh".to_string()],
        vec!["Chapter".to_string(), "Verse".to_string()],
        Numbering::Positional,
    ))
    .unwrap();

    lib.add_version(Version::new(
        "Shabbat",
        "he",
        "Vilna",
        folio_content(90, numbered_segments("s", 15)),
    ))
    .unwrap();
    lib.add_version(Version::new(
        "Shabbat",
        "en",
        "Translation",
        folio_content(90, numbered_segments("e", 12)),
    ))
    .unwrap();

    lib.add_version(Version::new(
        "Rashi on Shabbat",
        "he",
        "Vilna",
        folio_content(
            90,
            comment_groups(
                15,
                &[(11, &["r11a"]), (12, &["r12a", "r12b"]), (15, &["r15a"])],
            ),
        ),
    ))
    .unwrap();
    lib.add_version(Version::new(
        "Rashi on Shabbat",
        "he",
        "Alt",
        folio_content(
            90,
            comment_groups(12, &[(11, &["q11a", "q11b"]), (12, &["q12a"])]),
        ),
    ))
    .unwrap();

    lib.add_version(Version::new(
        "Genesis",
        "en",
        "Plain",
        Content::node(vec![leaf_section(&["g1", "g2"])]),
    ))
    .unwrap();

    lib.insert_link(Link::new("Shabbat 45b:12", "Genesis 1:1", "reference"));
    lib.insert_link(Link::new(
        "Rashi on Shabbat 45b:15:1",
        "Shabbat 45b:15",
        "commentary",
    ));
    lib.insert_link(Link::new(
        "Rashi on Shabbat 45b:12:1",
        "Shabbat 45b:12",
        "commentary",
    ));

    lib.insert_note(Note::new("Shabbat 45b:13", "later segment", "noter"));
    lib.insert_note(Note::new("Shabbat 45b:2", "earlier segment", "noter"));
    lib.insert_note(Note::new("Shabbat 46a:12", "other section", "noter"));
    lib.insert_note(Note::new("Atlantis 1:1", "unparseable", "noter"));

    lib.insert_translation_request(TranslationRequest::new("Shabbat 45b:14", "requester"));

    lib.insert_history(
        HistoryRecord::new("edit text")
            .with_citation("Shabbat 45b:15")
            .with_new(RefState {
                citation: Some("Shabbat 45b:12".to_string()),
                citations: Some(vec![
                    "Shabbat 45b:13".to_string(),
                    "Shabbat 45b:11".to_string(),
                ]),
            })
            .with_old(RefState {
                citation: Some("Shabbat 45b:14".to_string()),
                citations: Some(vec!["Shabbat 45b:12".to_string()]),
            }),
    );

    lib.add_outline_node("Shabbat", OutlineNode::whole("Perek topic", "Shabbat 45b:10-15"));
    lib.add_outline_node(
        "Shabbat",
        OutlineNode::listed(
            "Key passages",
            vec!["Shabbat 45b:12".to_string(), "Shabbat 45b:3".to_string()],
        ),
    );

    lib.insert_sheet(Sheet::new(
        "Reading",
        vec![SheetNode::cited("Genesis 1:1").with_children(vec![
            SheetNode::cited("Shabbat 45b:12"),
            SheetNode::comment_only("a remark")
                .with_children(vec![SheetNode::cited("Rashi on Shabbat 45b:12:2")]),
        ])],
    ));

    lib
}

/// Fixture around Sukkah 20b (linear section 40) for insert scenarios:
/// one edition and one commentary reach past the insertion point, one of
/// each stops exactly at it.
#[allow(dead_code)]
pub fn sukkah_library() -> Library {
    let mut lib = Library::new();

    lib.add_index(
        Index::new(
            "Sukkah",
            vec!["Talmud".to_string()],
            vec!["Daf".to_string(), "Line".to_string()],
            Numbering::Folio,
        )
        .with_declared_length(56),
    )
    .unwrap();
    let sukkah = lib.get_index("Sukkah").unwrap().clone();
    lib.add_index(Index::commentary("Rashi on Sukkah", &sukkah))
        .unwrap();
    lib.add_index(Index::commentary("Tosafot on Sukkah", &sukkah))
        .unwrap();

    lib.add_version(Version::new(
        "Sukkah",
        "he",
        "Vilna",
        folio_content(40, numbered_segments("u", 30)),
    ))
    .unwrap();
    lib.add_version(Version::new(
        "Sukkah",
        "en",
        "Translation",
        folio_content(40, numbered_segments("t", 29)),
    ))
    .unwrap();

    lib.add_version(Version::new(
        "Rashi on Sukkah",
        "he",
        "Vilna",
        folio_content(
            40,
            comment_groups(30, &[(29, &["sr29a"]), (30, &["sr30a", "sr30b"])]),
        ),
    ))
    .unwrap();
    lib.add_version(Version::new(
        "Tosafot on Sukkah",
        "he",
        "Vilna",
        folio_content(40, comment_groups(29, &[(29, &["to29a"])])),
    ))
    .unwrap();

    lib.insert_note(Note::new("Sukkah 20b:30", "after insertion point", "noter"));
    lib.insert_note(Note::new("Sukkah 20b:29", "at the anchor", "noter"));
    lib.insert_link(Link::new(
        "Rashi on Sukkah 20b:30:2",
        "Sukkah 20b:30",
        "commentary",
    ));

    lib
}

/// All note citations, sorted for comparison
#[allow(dead_code)]
pub fn note_citations(lib: &Library) -> Vec<String> {
    let mut citations: Vec<String> = lib.notes().map(|n| n.citation.clone()).collect();
    citations.sort();
    citations
}

/// All link citation pairs, sorted for comparison
#[allow(dead_code)]
pub fn link_refs(lib: &Library) -> Vec<[String; 2]> {
    let mut refs: Vec<[String; 2]> = lib.links().map(|l| l.refs.clone()).collect();
    refs.sort();
    refs
}
