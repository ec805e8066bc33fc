/// Returns true when the URI names a directory, i.e. ends with a slash
pub fn is_directory(uri: &str) -> bool {
    uri.ends_with('/')
}

/// Joins the index document onto a URI, inserting a slash unless the URI already ends with one
pub fn join_index(uri: &str, index_document: &str) -> String {
    let mut joined = String::with_capacity(uri.len() + index_document.len() + 1);
    joined.push_str(uri);
    if !is_directory(uri) {
        joined.push('/');
    }
    joined.push_str(index_document);
    joined
}
