use library_portal::{
    auth::{AuthState, AuthUser},
    error::{NavigationError, PatternError, RouteTableError},
    navigation::{
        Access, NavigationDecision, PathParams, RouteEntry, RouteName, RoutePattern, RouteTable,
        before_navigate,
    },
    pages::{DashboardPage, LoginPage},
};
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

fn library() -> RouteTable {
    RouteTable::library().expect("library routes are valid")
}

fn signed_in() -> AuthState {
    AuthState::Authenticated(AuthUser {
        id: Uuid::new_v4(),
        role: "member".to_string(),
    })
}

fn entry(path: &str, name: RouteName, access: Access) -> RouteEntry {
    RouteEntry::new(path, name, access, Arc::new(DashboardPage)).expect("valid pattern")
}

// --- resolve ---

#[test]
fn test_every_literal_path_resolves_to_its_entry() {
    let table = library();
    let cases = [
        ("/login", RouteName::Login, false),
        ("/dashboard", RouteName::Dashboard, true),
        ("/books", RouteName::BookList, true),
        ("/books/:id", RouteName::BookDetail, true),
        ("/borrow/:id", RouteName::BorrowForm, true),
    ];

    for (path, name, requires_auth) in cases {
        let matched = table.resolve(path).expect("registered path resolves");
        assert_eq!(matched.entry.name(), name, "path {path}");
        assert_eq!(matched.entry.requires_auth(), requires_auth, "path {path}");
    }
}

#[test]
fn test_login_resolves_public() {
    let table = library();
    let matched = table.resolve("/login").unwrap();
    assert_eq!(matched.entry.name(), RouteName::Login);
    assert!(!matched.entry.requires_auth());
    assert!(matched.params.is_empty());
}

#[test]
fn test_book_detail_extracts_id() {
    let table = library();
    let matched = table.resolve("/books/42").unwrap();
    assert_eq!(matched.entry.name(), RouteName::BookDetail);
    assert_eq!(matched.params.get("id"), Some("42"));
    assert_eq!(matched.params.len(), 1);
}

#[test]
fn test_params_are_percent_decoded() {
    let table = library();

    let matched = table.resolve("/books/a%20b").unwrap();
    assert_eq!(matched.params.get("id"), Some("a b"));

    let matched = table.resolve("/books/caf%C3%A9").unwrap();
    assert_eq!(matched.params.get("id"), Some("café"));

    let matched = table.resolve("/borrow/a%2Fb").unwrap();
    assert_eq!(matched.entry.name(), RouteName::BorrowForm);
    assert_eq!(matched.params.get("id"), Some("a/b"));
}

#[test]
fn test_param_with_invalid_utf8_is_not_found() {
    let table = library();
    assert_eq!(
        table.resolve("/books/%FF").unwrap_err(),
        NavigationError::NotFound {
            path: "/books/%FF".to_string()
        }
    );
}

#[test]
fn test_location_reencodes_decoded_params() {
    let table = library();
    let matched = table.resolve("/books/a%20b").unwrap();
    assert_eq!(matched.location(), "/books/a%20b");

    let params: PathParams = [("id", "a/b?c")].into_iter().collect();
    let path = table.url_for(RouteName::BookDetail, &params).unwrap();
    assert_eq!(path, "/books/a%2Fb%3Fc");
    assert_eq!(table.resolve(&path).unwrap().params.get("id"), Some("a/b?c"));
}

#[test]
fn test_borrow_form_extracts_id_independently() {
    let table = library();
    let matched = table.resolve("/borrow/42").unwrap();
    assert_eq!(matched.entry.name(), RouteName::BorrowForm);
    assert_eq!(matched.params.get("id"), Some("42"));
}

#[test]
fn test_unknown_path_is_not_found() {
    let table = library();
    assert_eq!(
        table.resolve("/unknown").unwrap_err(),
        NavigationError::NotFound {
            path: "/unknown".to_string()
        }
    );
    assert!(table.resolve("/").is_err());
    assert!(table.resolve("/books/42/extra").is_err());
    assert!(table.resolve("/books//42").is_err());
    assert!(table.resolve("books").is_err());
}

#[test]
fn test_resolve_ignores_query_fragment_and_trailing_slash() {
    let table = library();
    assert_eq!(
        table.resolve("/books/?sort=title").unwrap().entry.name(),
        RouteName::BookList
    );
    let matched = table.resolve("/books/7#reviews").unwrap();
    assert_eq!(matched.entry.name(), RouteName::BookDetail);
    assert_eq!(matched.params.get("id"), Some("7"));
}

#[test]
fn test_literal_segments_match_case_insensitively() {
    let table = library();
    let matched = table.resolve("/Books/AbC").unwrap();
    assert_eq!(matched.entry.name(), RouteName::BookDetail);
    // Parameter text is kept as typed.
    assert_eq!(matched.params.get("id"), Some("AbC"));
}

#[test]
fn test_first_registered_match_wins() {
    // Different segment counts never overlap, so both orders are valid tables;
    // resolution still walks entries in registration order.
    let table = RouteTable::new(vec![
        entry("/login", RouteName::Login, Access::Public),
        entry("/books/:id", RouteName::BookDetail, Access::Authenticated),
        entry("/books", RouteName::BookList, Access::Authenticated),
    ])
    .unwrap();

    let names: Vec<RouteName> = table.entries().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![RouteName::Login, RouteName::BookDetail, RouteName::BookList]
    );
    assert_eq!(table.resolve("/books").unwrap().entry.name(), RouteName::BookList);
}

// --- guard ---

#[test]
fn test_gated_entries_redirect_anonymous_sessions() {
    let table = library();
    for entry in table.entries().iter().filter(|e| e.requires_auth()) {
        assert_eq!(
            before_navigate(entry, &AuthState::Anonymous),
            NavigationDecision::Redirect {
                to: RouteName::Login
            },
            "entry {}",
            entry.name()
        );
    }
}

#[test]
fn test_gated_entries_allow_authenticated_sessions() {
    let table = library();
    let auth = signed_in();
    for entry in table.entries() {
        assert_eq!(table.before_navigate(entry, &auth), NavigationDecision::Allow);
    }
}

#[test]
fn test_login_is_never_gated() {
    let table = library();
    let login = table.login_entry();
    assert_eq!(login.name(), RouteName::Login);
    assert_eq!(
        before_navigate(login, &AuthState::Anonymous),
        NavigationDecision::Allow
    );
    assert_eq!(before_navigate(login, &signed_in()), NavigationDecision::Allow);
}

#[test]
fn test_navigate_redirect_targets_login_page() {
    let table = library();
    let navigation = table.navigate("/borrow/9", &AuthState::Anonymous).unwrap();

    assert_eq!(navigation.requested, RouteName::BorrowForm);
    assert_eq!(
        navigation.decision,
        NavigationDecision::Redirect {
            to: RouteName::Login
        }
    );
    assert_eq!(navigation.target.entry.name(), RouteName::Login);
    assert!(navigation.target.params.is_empty());
    assert_eq!(navigation.target.location(), "/login");
}

#[test]
fn test_navigate_allow_keeps_params() {
    let table = library();
    let navigation = table.navigate("/borrow/9", &signed_in()).unwrap();

    assert_eq!(navigation.decision, NavigationDecision::Allow);
    assert_eq!(navigation.target.entry.name(), RouteName::BorrowForm);
    assert_eq!(navigation.target.location(), "/borrow/9");
}

// --- construction invariants ---

#[test]
fn test_entry_names_are_pairwise_unique() {
    let table = library();
    let names: HashSet<RouteName> = table.entries().iter().map(|e| e.name()).collect();
    assert_eq!(names.len(), table.entries().len());
    assert_eq!(names.len(), RouteName::ALL.len());
}

#[test]
fn test_duplicate_name_is_rejected() {
    let result = RouteTable::new(vec![
        entry("/login", RouteName::Login, Access::Public),
        entry("/books", RouteName::BookList, Access::Authenticated),
        entry("/catalogue", RouteName::BookList, Access::Authenticated),
    ]);
    assert_eq!(
        result.unwrap_err(),
        RouteTableError::DuplicateName(RouteName::BookList)
    );
}

#[test]
fn test_literal_and_param_collision_is_rejected() {
    let result = RouteTable::new(vec![
        entry("/login", RouteName::Login, Access::Public),
        entry("/books/:id", RouteName::BookDetail, Access::Authenticated),
        entry("/books/new", RouteName::BorrowForm, Access::Authenticated),
    ]);
    assert_eq!(
        result.unwrap_err(),
        RouteTableError::AmbiguousPatterns {
            first: "/books/:id".to_string(),
            second: "/books/new".to_string(),
        }
    );
}

#[test]
fn test_login_must_exist_and_be_public() {
    let missing = RouteTable::new(vec![entry(
        "/dashboard",
        RouteName::Dashboard,
        Access::Authenticated,
    )]);
    assert_eq!(
        missing.unwrap_err(),
        RouteTableError::MissingLogin(RouteName::Login)
    );

    let gated = RouteTable::new(vec![
        RouteEntry::new(
            "/login",
            RouteName::Login,
            Access::Authenticated,
            Arc::new(LoginPage),
        )
        .unwrap(),
    ]);
    assert_eq!(gated.unwrap_err(), RouteTableError::GatedLogin(RouteName::Login));
}

// --- patterns and reverse lookup ---

#[test]
fn test_invalid_patterns_are_rejected() {
    assert_eq!(
        RoutePattern::parse("books").unwrap_err(),
        PatternError::MissingLeadingSlash("books".to_string())
    );
    assert_eq!(
        RoutePattern::parse("/books//x").unwrap_err(),
        PatternError::EmptySegment("/books//x".to_string())
    );
    assert_eq!(
        RoutePattern::parse("/books/:").unwrap_err(),
        PatternError::UnnamedParam {
            pattern: "/books/:".to_string()
        }
    );
    assert_eq!(
        RoutePattern::parse("/a/:id/b/:id").unwrap_err(),
        PatternError::DuplicateParam {
            pattern: "/a/:id/b/:id".to_string(),
            param: "id".to_string()
        }
    );
}

#[test]
fn test_pattern_overlap_rules() {
    let detail = RoutePattern::parse("/books/:id").unwrap();
    let borrow = RoutePattern::parse("/borrow/:id").unwrap();
    let list = RoutePattern::parse("/books").unwrap();
    let shadow = RoutePattern::parse("/:section/:id").unwrap();

    assert!(!detail.overlaps(&borrow));
    assert!(!detail.overlaps(&list));
    assert!(detail.overlaps(&shadow));
    assert!(shadow.overlaps(&borrow));
}

#[test]
fn test_url_for_builds_named_routes() {
    let table = library();
    let params: PathParams = [("id", "42")].into_iter().collect();

    assert_eq!(table.url_for(RouteName::BookDetail, &params).unwrap(), "/books/42");
    assert_eq!(table.url_for(RouteName::BorrowForm, &params).unwrap(), "/borrow/42");
    assert_eq!(
        table.url_for(RouteName::Login, &PathParams::new()).unwrap(),
        "/login"
    );
    assert_eq!(
        table
            .url_for(RouteName::BookDetail, &PathParams::new())
            .unwrap_err(),
        NavigationError::MissingParam {
            route: RouteName::BookDetail,
            param: "id".to_string()
        }
    );
}

#[test]
fn test_url_for_unknown_route() {
    let table = RouteTable::new(vec![entry("/login", RouteName::Login, Access::Public)]).unwrap();
    assert_eq!(
        table
            .url_for(RouteName::Dashboard, &PathParams::new())
            .unwrap_err(),
        NavigationError::UnknownRoute(RouteName::Dashboard)
    );
}
