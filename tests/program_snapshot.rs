//! tests/program_snapshot.rs
//! Snapshot of a complete emitted translation unit.

use vyrn::Compiler;

#[test]
fn demo_program_is_stable() {
    let src = r#"
        let int count = 3;
        const float rate = 0,5;
        let string name = "vyrn";
        let bool ready = count >= 3 && rate < 1;
        count = count + 1;
        ghost = 1;
        log(ready);
        log(name);
    "#;
    let program = Compiler::new().translate(src).program();
    insta::assert_snapshot!(program.trim_end(), @r###"
#include <iostream>
#include <string>
#include <cmath>

int main() {
    std::cout << std::boolalpha;
    int count = 3;
    const float rate = 0.5;
    std::string name = "vyrn";
    bool ready = true;
    count = (count + 1);
    // Error: variable 'ghost' is not declared
    std::cout << ready << std::endl;
    std::cout << name << std::endl;
    return 0;
}
"###);
}
