// GROQ queries against the content store.
// Public reads only see applications with status "published"; ids under
// `drafts.` are excluded everywhere.

/// One application by slug, with linked projects dereferenced. Param: `$slug`.
pub const APPLICATION_BY_SLUG_QUERY: &str = r#"*[_type == "jobApplication" && slug.current == $slug && status == "published" && !(_id in path("drafts.**"))][0]{
  "slug": slug.current,
  targetCompany,
  targetRoleTitle,
  customIntroduction,
  "alignmentPoints": coalesce(alignmentPoints[]{category, content}, []),
  closingStatement,
  "linkedProjects": coalesce(linkedProjects[]->{projectId, name, focus, keyMetric}, [])
}"#;

/// Slugs of every published application.
pub const APPLICATION_SLUGS_QUERY: &str =
    r#"*[_type == "jobApplication" && defined(slug.current) && status == "published" && !(_id in path("drafts.**"))].slug.current"#;

/// Project catalog in the shape the draft prompt embeds.
pub const PROJECT_CATALOG_QUERY: &str = r#"*[_type == "project" && defined(projectId) && !(_id in path("drafts.**"))] | order(projectId asc){
  "id": projectId,
  "name": coalesce(name, ""),
  "focus": coalesce(focus, ""),
  "keyMetric": coalesce(keyMetric, "")
}"#;
