/// Site path of a CMS document.
pub fn resolve(document_type: &str, uid: Option<&str>) -> String {
    match (document_type, uid) {
        ("posts", Some(uid)) => format!("/post/{}", uid),
        _ => "/".to_string(),
    }
}
