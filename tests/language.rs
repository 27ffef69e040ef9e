use std::io::Cursor;

use quill::{interpret, run, run_seeded};

fn run_program(source: &str) -> String {
    let mut output = Vec::new();
    let ok = interpret(Cursor::new(source), &mut output);
    let text = String::from_utf8(output).expect("script output was not UTF-8");
    assert!(ok, "script failed:\n{source}\noutput: {text}");
    text
}

fn assert_output(source: &str, expected: &str) {
    assert_eq!(run_program(source), expected, "script:\n{source}");
}

fn assert_failure(source: &str) {
    let mut output = Vec::new();
    assert!(!interpret(Cursor::new(source), &mut output),
            "script succeeded but was expected to fail:\n{source}");
}

fn run_with_input(source: &str, input: &str) -> String {
    let mut input = Cursor::new(input);
    let mut output = Vec::new();
    run(source, &mut input, &mut output).expect("script failed");
    String::from_utf8(output).unwrap()
}

#[test]
fn arithmetic_on_variables() {
    assert_output("a=1\nb=2\nc=a+b\nprint(c)", "3");
}

#[test]
fn if_without_else() {
    assert_output("if true then print(\"true\") end if", "true");
}

#[test]
fn if_with_else() {
    assert_output("if 1 < 0 then print(\"true\") else print(\"false\") end if",
                  "false");
}

#[test]
fn for_loop_accumulates_digits() {
    assert_output("a=\"\"\nfor i in range(1, 10, 1)\n    a += to_string(i)\nend for\nprint(a)",
                  "123456789");
}

#[test]
fn string_slice_two_indices() {
    assert_output("a=\"ITMOITMO\"\nprint(a[1:8])", "TMOITMO");
}

#[test]
fn factorial_via_for_loop() {
    assert_output("n=10\nres=1\nfor i in range(1, n+1, 1)\n    res *= i\nend for\nprint(res)",
                  "3628800");
}

#[test]
fn list_mutation_is_visible_through_aliases() {
    assert_output("x=[1,2,3]\ny=x\npush(x,4)\nprint(len(y))", "4");
}

#[test]
fn function_literal_assignment_and_call() {
    assert_output("f = function(x) return x*x end function\nprint(f(7))", "49");
}

#[test]
fn string_subtraction_strips_suffix() {
    assert_output("print(\"abc\" - \"bc\")", "a");
    assert_output("print(\"abc\" - \"x\")", "abc");
}

#[test]
fn list_repetition_is_cyclic() {
    assert_output("print([1,2]*3)", "[1, 2, 1, 2, 1, 2]");
}

#[test]
fn operator_precedence() {
    assert_output("print(2 + 3 * 4)", "14");
    assert_output("print((2 + 3) * 4)", "20");
    assert_output("print(2 ^ 3 ^ 2)", "512");
    assert_output("print(-2 ^ 2)", "4");
    assert_output("print(10 - 2 - 3)", "5");
}

#[test]
fn assignment_chains_right_associatively() {
    assert_output("b = 0\nc = 7\na = b = c\nprint(a + b)", "14");
}

#[test]
fn compound_assignments() {
    assert_output("x = 2\nx += 3\nprint(x)", "5");
    assert_output("x = 7\nx -= 2\nprint(x)", "5");
    assert_output("x = 4\nx *= 2\nprint(x)", "8");
    assert_output("x = 9\nx /= 3\nprint(x)", "3");
    assert_output("x = 10\nx %= 4\nprint(x)", "2");
    assert_output("x = 3\nx ^= 2\nprint(x)", "9");
}

#[test]
fn comparisons_yield_numbers() {
    assert_output("print(1 < 2)", "1");
    assert_output("print(2 <= 1)", "0");
    assert_output("print(\"abc\" < \"abd\")", "1");
    assert_output("print(\"b\" >= \"a\")", "1");
    assert_output("print(nil == nil)", "1");
}

#[test]
fn comparisons_across_types_are_false() {
    assert_output("print(1 == \"1\")", "0");
    assert_output("print(1 != \"1\")", "0");
    assert_output("print(nil < 1)", "0");
}

#[test]
fn list_equality_is_identity() {
    assert_output("x = [1]\ny = x\nprint(x == y)", "1");
    assert_output("x = [1]\ny = [1]\nprint(x == y)", "0");
}

#[test]
fn truthiness() {
    assert_output("if \"\" then print(\"full\") else print(\"empty\") end if",
                  "empty");
    assert_output("if [1] then print(\"full\") end if", "full");
    assert_output("if nil then print(\"yes\") else print(\"no\") end if", "no");
    assert_output("f = function() return 1 end function\nif f then print(\"t\") else print(\"f\") end if",
                  "f");
}

#[test]
fn logical_operators_short_circuit() {
    assert_output("print(0 and crash())", "0");
    assert_output("print(1 or crash())", "1");
    assert_output("print(1 and 2)", "1");
    assert_output("print(0 or 0)", "0");
    assert_output("print(not 0)", "1");
    assert_output("print(not \"x\")", "0");
}

#[test]
fn while_loop_with_break() {
    assert_output("i = 0\nwhile true\n    i += 1\n    if i == 3 then\n        break\n    end if\nend while\nprint(i)",
                  "3");
}

#[test]
fn while_loop_with_continue() {
    assert_output("i = 0\ns = 0\nwhile i < 5\n    i += 1\n    if i == 2 then\n        continue\n    end if\n    s += i\nend while\nprint(s)",
                  "13");
}

#[test]
fn for_loop_with_continue() {
    assert_output("total = 0\nfor i in range(1, 6, 1)\n    if i % 2 == 0 then\n        continue\n    end if\n    total += i\nend for\nprint(total)",
                  "9");
}

#[test]
fn break_exits_only_the_inner_loop() {
    assert_output("count = 0\nfor i in range(0, 3, 1)\n    while true\n        break\n    end while\n    count += 1\nend for\nprint(count)",
                  "3");
}

#[test]
fn for_loop_over_string_is_bytewise() {
    assert_output("for ch in \"abc\"\n    print(ch)\nend for", "abc");
}

#[test]
fn elseif_chain() {
    let source = "x = 2\nif x == 1 then\n    print(\"one\")\nelseif x == 2 then\n    print(\"two\")\nelseif x == 3 then\n    print(\"three\")\nelse\n    print(\"many\")\nend if";
    assert_output(source, "two");
}

#[test]
fn top_level_return_stops_the_program() {
    assert_output("print(\"a\")\nreturn 0\nprint(\"b\")", "a");
}

#[test]
fn functions_resolve_free_names_at_call_time() {
    assert_output("x = 10\nget_x = function()\n    return x\nend function\nprint(get_x())",
                  "10");
}

#[test]
fn recursion() {
    assert_output("fact = function(n)\n    if n < 2 then\n        return 1\n    end if\n    return n * fact(n - 1)\nend function\nprint(fact(5))",
                  "120");
}

#[test]
fn call_without_return_yields_nil() {
    assert_output("f = function(x) x + 1 end function\nprint(f(1) == nil)", "1");
}

#[test]
fn unnamed_call_of_function_literal() {
    assert_output("print(function(x) return x + 1 end function(4))", "5");
}

#[test]
fn arguments_evaluate_in_caller_scope() {
    assert_output("x = 5\nf = function(x) return x end function\nprint(f(x + 1))",
                  "6");
}

#[test]
fn print_returns_the_printed_value() {
    assert_output("a = print(5)\nprint(a)", "55");
}

#[test]
fn print_forms() {
    assert_output("print(nil)", "nil");
    assert_output("f = function() return 0 end function\nprint(f)", "function");
    assert_output("print([1, \"a\", nil])", "[1, \"a\", nil]");
    assert_output("print(3.0)", "3");
    assert_output("print(2.5)", "2.500000");
    assert_output("print(to_string(\"abc\"))", "abc");
    assert_output("println(1)", "1\n");
}

#[test]
fn division_follows_ieee() {
    assert_output("print(1/0)", "inf");
    assert_output("print(-1/0)", "-inf");
    assert_output("print(7 % 2)", "1");
}

#[test]
fn number_format_round_trip() {
    assert_output("print(to_string(parse_num(\"1.5\")))", "1.500000");
    assert_output("print(parse_num(to_string(123456)))", "123456");
}

#[test]
fn string_escapes() {
    assert_output("print(\"a\\tb\")", "a\tb");
    assert_output("print(\"say \\\"hi\\\"\")", "say \"hi\"");
    assert_output("print(\"back\\\\slash\")", "back\\slash");
    assert_output("print(\"\\q\")", "q");
}

#[test]
fn comments_are_skipped() {
    assert_output("// leading comment\nx = 1 /* inline */ + 2\nprint(x)", "3");
    assert_output("/* multi\nline\ncomment */\nprint(\"ok\")", "ok");
}

#[test]
fn string_builtins() {
    assert_output("print(upper(\"abc\"))", "ABC");
    assert_output("print(lower(\"AbC\"))", "abc");
    assert_output("print(capitalize(\"rust\"))", "Rust");
    assert_output("print(len(\"hello\"))", "5");
    assert_output("print(\"ab\" * 2.5)", "ababa");
}

#[test]
fn capitalize_mutates_through_the_alias() {
    assert_output("a = \"hello\"\nb = a\ncapitalize(b)\nprint(a)", "Hello");
}

#[test]
fn split_and_join() {
    assert_output("print(join(split(\"a,b,c\", \",\"), \"-\"))", "a-b-c");
    assert_output("print(len(split(\"a,\", \",\")))", "2");
    assert_output("print(join([1, \"x\", nil], \" \"))", "1 x nil");
}

#[test]
fn replace_scans_left_to_right() {
    assert_output("print(replace(\"aaa\", \"a\", \"b\"))", "bbb");
    assert_output("print(replace(\"aaaa\", \"aa\", \"a\"))", "aa");
    assert_output("print(replace(\"banana\", \"an\", \"om\"))", "bomoma");
}

#[test]
fn numeric_builtins() {
    assert_output("print(abs(-3))", "3");
    assert_output("print(sqrt(9))", "3");
    assert_output("print(floor(1.7))", "1");
    assert_output("print(ceil(1.2))", "2");
    assert_output("print(round(2.5))", "3");
    assert_output("print(round(-2.5))", "-3");
}

#[test]
fn parse_num_is_strict() {
    assert_output("print(parse_num(\"42\") + 1)", "43");
    assert_output("print(parse_num(\"4x\") == nil)", "1");
    assert_output("print(parse_num([1]) == nil)", "1");
}

#[test]
fn range_builtin() {
    assert_output("print(range(0, 4, 1))", "[0, 1, 2, 3]");
    assert_output("print(join(range(3, 0, -1), \",\"))", "3,2,1");
}

#[test]
fn list_mutators() {
    assert_output("x = [1, 2]\npush(x, 3)\ninsert(x, 0, 0)\nremove(x, 2)\nprint(x)",
                  "[0, 1, 3]");
    assert_output("x = [1, 2]\npop(x)\nprint(x)", "[1]");
    assert_output("print(len(push([1], 2)))", "2");
}

#[test]
fn sort_builtin() {
    assert_output("print(sort([3, 1, 2]))", "[1, 2, 3]");
    assert_output("print(sort([\"b\", \"a\"]))", "[\"a\", \"b\"]");
    assert_output("x = [[1, 2], [3]]\nsort(x)\nprint(len(x[0]))", "1");
}

#[test]
fn stacktrace_dumps_the_innermost_frame() {
    assert_output("a = 1\nb = \"x\"\nprint(stacktrace())",
                  "variable name: a, value: 1\nvariable name: b, value: \"x\"\n");
}

#[test]
fn rnd_yields_a_nonnegative_integer() {
    assert_output("r = rnd(0)\nprint(r >= 0 and r < 2147483648)", "1");
    assert_output("r = rnd(0)\nprint(floor(r) == r)", "1");
}

#[test]
fn rnd_is_reproducible_with_a_seed() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    run_seeded("print(rnd(0))", &mut Cursor::new(""), &mut first, 7).unwrap();
    run_seeded("print(rnd(0))", &mut Cursor::new(""), &mut second, 7).unwrap();
    assert_eq!(first, second);
}

#[test]
fn read_consumes_lines() {
    assert_eq!(run_with_input("name = read()\nprintln(name)", "Ada\n"), "Ada\n");
    assert_eq!(run_with_input("a = read()\nb = read()\nprint(a + \"|\" + b)",
                              "one\ntwo\n"),
               "one|two");
    assert_eq!(run_with_input("print(len(read()))", ""), "0");
}

#[test]
fn list_element_access() {
    assert_output("x = [1, 2, 3]\nprint(x[0])", "1");
    assert_output("x = [1, 2, 3]\nprint(x[-1])", "3");
    assert_output("m = [[1, 2], [3]]\nprint(m[1][0])", "3");
}

#[test]
fn list_sublists() {
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[1:3])", "[2, 3]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[:2])", "[1, 2]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[2:])", "[3, 4, 5]");
    assert_output("x = [1, 2, 3]\nprint(x[:])", "[1, 2, 3]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[-3:-1])", "[3, 4]");
    assert_output("x = [1, 2, 3]\nprint(x[0:10])", "[1, 2, 3]");
    assert_output("x = [1, 2, 3]\nprint(x[2:1])", "[]");
}

#[test]
fn list_slices_with_stride() {
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[0:5:2])", "[1, 3, 5]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[::2])", "[1, 3, 5]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[::-1])", "[5, 4, 3, 2, 1]");
    assert_output("x = [1, 2, 3, 4, 5]\nprint(x[3:0:-1])", "[4, 3, 2]");
}

#[test]
fn string_element_access() {
    assert_output("print(\"hello\"[0])", "h");
    assert_output("print(\"hello\"[4])", "o");
    assert_output("print(len(\"hello\"[5]))", "0");
    assert_output("print(\"hello\"[1:3])", "el");
    assert_output("print(len(\"hello\"[5:9]))", "0");
}

#[test]
fn slice_of_an_expression() {
    assert_output("print(([1, 2] + [3])[2])", "3");
}

#[test]
fn sublist_elements_stay_shared() {
    assert_output("x = [[1], [2]]\ny = x[0:1]\npush(y[0], 9)\nprint(x[0])",
                  "[1, 9]");
}

#[test]
fn assignments_update_the_binding_frame() {
    assert_output("x = 1\nif true then\n    x = 2\n    y = 3\nend if\nprint(x)",
                  "2");
}

#[test]
fn block_locals_do_not_escape() {
    assert_failure("if true then\n    y = 3\nend if\nprint(y)");
}

#[test]
fn lexer_errors() {
    assert_failure("@");
    assert_failure("x = \"abc");
    assert_failure("/* never closed");
    assert_failure("x = 1.2.3");
    assert_failure("_x = 1");
    assert_failure("x = 1e");
}

#[test]
fn parser_errors() {
    assert_failure("print(");
    assert_failure("if true print(1) end if");
    assert_failure("while true\nbreak\nend for");
    assert_failure("end");
    assert_failure("x = ");
    assert_failure("x = [1, 2,]");
    assert_failure("x = [1][]");
    assert_failure("x = [1][1:2:3:4]");
    assert_failure("print(1) print(2)");
}

#[test]
fn runtime_errors() {
    assert_failure("print(x)");
    assert_failure("1 = 2");
    assert_failure("x += 1");
    assert_failure("print([1] + 1)");
    assert_failure("print(\"a\" * -1)");
    assert_failure("print([1] * -1)");
    assert_failure("print(-\"a\")");
    assert_failure("x = 5\nx(1)");
    assert_failure("y()");
    assert_failure("f = function(a, b) return a end function\nf(1)");
    assert_failure("f = function(a, b) return a end function\ng = f\nprint((g)(1))");
    assert_failure("len(1)");
    assert_failure("lower(1)");
    assert_failure("pop([])");
    assert_failure("x = [1]\nprint(x[3])");
    assert_failure("x = [1]\nprint(x[-2])");
    assert_failure("x = [1]\nremove(x, 1)");
    assert_failure("x = [1]\ninsert(x, 5, 0)");
    assert_failure("range(1, 1, 1)");
    assert_failure("range(1, 2, 0)");
    assert_failure("range(5, 1, 1)");
    assert_failure("sort([1, \"a\"])");
    assert_failure("f = function() return 0 end function\nsort([f])");
    assert_failure("split(\"abc\", \"\")");
    assert_failure("replace(\"abc\", \"\", \"x\")");
    assert_failure("x = [1, 2]\nprint(x[0:2:0])");
    assert_failure("print(\"abc\"[0:2:1])");
    assert_failure("x = 5\nprint(x[0])");
}

#[test]
fn parsing_is_deterministic() {
    use quill::interpreter::{lexer::tokenize, parser::statement::parse_program};

    let source = "a = 1\nwhile a < 10\n    a += 1\nend while\nprint(a)";
    let first_tokens = tokenize(source).unwrap();
    let second_tokens = tokenize(source).unwrap();
    assert_eq!(first_tokens, second_tokens);

    let first = parse_program(&mut first_tokens.iter().peekable()).unwrap();
    let second = parse_program(&mut second_tokens.iter().peekable()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn newlines_inside_brackets_are_skipped() {
    assert_output("x = [\n    1,\n    2\n]\nprint(len(x))", "2");
    assert_output("f = function(\n    a,\n    b\n) return a + b end function\nprint(f(1, 2))",
                  "3");
    assert_output("print(\n    42\n)", "42");
}
