use super::*;
use crate::host::DeclaredForm;
use crate::memory::{MemoryProgram, PropertySpec};
use rayon::prelude::*;

fn sample_program(id: u64) -> MemoryProgram {
    let mut program = MemoryProgram::new(ProgramId(id));
    let file = program.add_file("src/model.ts");
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let user = program.object(vec![
        PropertySpec::new("id", number),
        PropertySpec::new("name", string),
    ]);
    program.declare(file, 0, DeclaredForm::ObjectShape, "User", user);
    let named = program.object(vec![PropertySpec::new("name", string)]);
    program.declare(file, 40, DeclaredForm::ObjectShape, "Named", named);
    program
}

fn cache() -> ShapeIndexCache {
    ShapeIndexCache::new(ShapeIndexOptions::default()).expect("default options are valid")
}

#[test]
fn test_index_built_once_per_program() {
    let cache = cache();
    let program = sample_program(1);

    let first = cache.get_or_build(&program).expect("index");
    let second = cache.get_or_build(&program).expect("index");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert_eq!(first.program(), ProgramId(1));
    assert_eq!(first.stats().records, 2);
}

#[test]
fn test_new_program_identity_gets_new_entry() {
    let cache = cache();
    let program = sample_program(1);
    let rechecked = program.clone().with_program_id(ProgramId(2));

    let before = cache.get_or_build(&program).expect("index");
    let after = cache.get_or_build(&rechecked).expect("index");
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.program(), ProgramId(2));
    assert_eq!(cache.len(), 2);

    // The old entry is untouched.
    let again = cache.get(ProgramId(1)).expect("still cached");
    assert!(Arc::ptr_eq(&before, &again));
}

#[test]
fn test_missing_type_info_is_not_cached() {
    let cache = cache();
    let program = sample_program(7).without_type_info();

    let result = cache.get_or_build(&program);
    assert_eq!(
        result.err(),
        Some(ShapeIndexError::TypeInfoUnavailable {
            program: ProgramId(7)
        })
    );
    assert!(cache.is_empty());
    assert!(cache.get(ProgramId(7)).is_none());
}

#[test]
fn test_get_does_not_build() {
    let cache = cache();
    assert!(cache.get(ProgramId(3)).is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_forget_and_clear() {
    let cache = cache();
    let first = sample_program(1);
    let second = sample_program(2);
    let stale = cache.get_or_build(&first).expect("index");
    cache.get_or_build(&second).expect("index");

    assert!(cache.forget(ProgramId(1)));
    assert!(!cache.forget(ProgramId(1)));
    assert_eq!(cache.len(), 1);

    // A forgotten program is rebuilt on next access.
    let rebuilt = cache.get_or_build(&first).expect("index");
    assert!(!Arc::ptr_eq(&stale, &rebuilt));
    assert_eq!(rebuilt.stats(), stale.stats());

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_invalid_options_rejected() {
    let options = ShapeIndexOptions {
        depth_limit: 0,
        ..ShapeIndexOptions::default()
    };
    assert_eq!(
        ShapeIndexCache::new(options).err(),
        Some(ShapeIndexError::InvalidDepthLimit(0))
    );
}

#[test]
fn test_cache_options_apply_to_builds() {
    let options = ShapeIndexOptions {
        depth_limit: 2,
        ..ShapeIndexOptions::default()
    };
    let cache = ShapeIndexCache::new(options).expect("valid options");
    assert_eq!(cache.options().depth_limit, 2);

    let program = sample_program(1);
    let index = cache.get_or_build(&program).expect("index");
    let keys: Vec<&str> = index
        .object_candidates()
        .iter()
        .map(|record| record.canonical().as_str())
        .collect();
    assert_eq!(
        keys,
        vec!["object{id:#DepthLimit,name:#DepthLimit}", "object{name:#DepthLimit}"]
    );
}

#[test]
fn test_concurrent_first_access_builds_once() {
    let cache = cache();
    let program = sample_program(11);

    let indices: Vec<Arc<ProgramIndex>> = (0..32)
        .into_par_iter()
        .map(|_| cache.get_or_build(&program).expect("index"))
        .collect();

    let first = &indices[0];
    assert!(indices.iter().all(|index| Arc::ptr_eq(first, index)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_concurrent_access_across_programs() {
    let cache = cache();
    let programs: Vec<MemoryProgram> = (100..108).map(sample_program).collect();

    programs.par_iter().for_each(|program| {
        let index = cache.get_or_build(program).expect("index");
        assert_eq!(index.program(), program.program_id());
    });
    assert_eq!(cache.len(), programs.len());
}

#[test]
fn test_global_cache_shared() {
    // A program id no other test uses, since the global cache is process-wide.
    let program = sample_program(9_001);

    let first = build_index(&program).expect("index");
    let second = build_index(&program).expect("index");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(ShapeIndexCache::global().get(ProgramId(9_001)).is_some());
    assert_eq!(
        ShapeIndexCache::global().options(),
        &ShapeIndexOptions::default()
    );
}
