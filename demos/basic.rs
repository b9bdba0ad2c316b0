use whereclause::*;

struct Sqlite;

impl ProbeExecutor for Sqlite {
    fn select_value(&self, probe: Probe, _collation: Option<&str>) -> std::result::Result<Value, ProbeError> {
        match probe {
            Probe::SensitiveLike | Probe::InsensitiveLike | Probe::Equality => Ok(Value::Int(1)),
            Probe::Regex => Err(ProbeError::NotSupported),
        }
    }
}

fn main() -> Result<()> {
    // 1. Records to filter
    let rows = vec![
        Row::new().with("name", "small").with("value", 1),
        Row::new().with("name", "big").with("value", 10),
        Row::new().with("name", "BIG").with("value", 100),
        Row::new().with("name", Value::Null).with("value", Value::Null),
    ];

    // 2. Build conditions
    let conds = Conditions::new()
        .with("name", Operator::iregex("^big$")?)
        .with("value", Operator::gte(10));

    // 3. Evaluate in memory
    for row in rows.matching(&conds) {
        println!("match: {:?}", row.get("name"));
    }
    for row in rows.not_matching(&conds) {
        println!("negated match: {:?}", row.get("name"));
    }

    // 4. Compile for the default backend
    let fragments = FragmentCompiler::new(Settings::default()).compile_all(&conds)?;
    println!("Fragments: {:#?}", fragments);

    // 5. Detect a different backend and compile again
    let settings = detect(&Sqlite, "sqlite3")?;
    println!("Detected: {:?}", settings.snapshot());
    let fragments = FragmentCompiler::new(settings).compile_all(&conds)?;
    println!("Fragments: {:#?}", fragments);

    // 6. Patterns with no wildcard form need native regex support
    let native = Conditions::new().with("name", Operator::regex("^b[io]g$")?);
    match FragmentCompiler::new(settings).compile_all(&native) {
        Ok(fragments) => println!("Fragments: {:#?}", fragments),
        Err(e) => println!("Compile error: {}", e),
    }
    Ok(())
}
