use tracing::{info, warn};

use crate::{
    ast::{Call, Statement},
    error::RuntimeError,
    interpreter::{
        codegen::{
            core::{GenResult, Generator, PREAMBLE, tabs},
            host_type::lower_type,
            statement::lower_params,
            toolchain::{CompilationUnit, UnitKind},
        },
        lexer::Token,
        value::url::UrlValue,
    },
};

/// Names derived from the remotely called function.
struct RemoteNames {
    class:     String,
    interface: String,
    server:    String,
}

impl RemoteNames {
    fn of(callee: &str) -> Self {
        let class = callee.to_uppercase();
        Self { interface: format!("{class}_Interface"),
               server: format!("{class}_Server"),
               class }
    }
}

impl Generator<'_, '_> {
    /// Appends a `dasync` statement: a task that activates the remote object
    /// at `url` and assigns the result of calling it to `target`.
    ///
    /// The first `dasync` on a function also generates its server unit.
    pub(super) fn gen_dasync(&mut self,
                             out: &mut String,
                             target: &Token,
                             url: &Token,
                             call: &Call,
                             token: &Token,
                             tab: usize)
                             -> GenResult<()> {
        self.gen_task_prologue(out, target, token, "dasync", tab)?;

        let names = RemoteNames::of(&call.callee.text);
        let (t0, t1, t2, t3) = (tabs(tab), tabs(tab + 1), tabs(tab + 2), tabs(tab + 3));
        let task = self.task_declaration(target);
        out.push_str(&format!("{t0}{task} = new Task(\n"));
        out.push_str(&format!("{t1}delegate()\n"));
        out.push_str(&format!("{t1}{{\n"));
        out.push_str(&format!("{t2}try\n"));
        out.push_str(&format!("{t2}{{\n"));
        out.push_str(&format!("{t3}ChannelServices.RegisterChannel(new TcpChannel(), false);\n"));
        out.push_str(&format!("{t3}{0} remoteObject = ({0})Activator.GetObject(typeof({0}), {1});\n",
                              names.interface,
                              url.text));
        out.push_str(&format!("{t3}{} = remoteObject.", target.text));
        self.gen_call(out, call, tab + 3);
        out.push_str(";\n");
        out.push_str(&format!("{t2}}}\n"));
        out.push_str(&format!("{t2}catch (RemotingException) {{ Console.WriteLine(\"The channel has already been registered.\"); }}\n"));
        out.push_str(&format!("{t2}catch (System.Net.Sockets.SocketException) {{ Console.WriteLine(\"No connection could be made because the target machine actively refused it.\"); }}\n"));
        out.push_str(&format!("{t1}}}\n"));
        out.push_str(&format!("{t0});\n"));
        out.push_str(&format!("{t0}Task_{}.Start();", target.text));

        if self.server_names.insert(names.server.clone()) {
            let address = self.annotations
                              .remote_urls
                              .get(&token.offset)
                              .cloned()
                              .ok_or_else(|| RuntimeError::UnknownRemoteAddress { name: url.text.clone(),
                                                                                 at:   url.position(), })?;
            let unit = self.gen_server(&names, call, &address)?;
            self.publish_server(unit);
        }
        Ok(())
    }

    /// Generates the server unit exposing the program-level function called
    /// by `call`.
    ///
    /// The remote class carries every program-level declaration except `Main`
    /// as a public member, so the function keeps access to the globals and
    /// helpers it uses.
    fn gen_server(&mut self, names: &RemoteNames, call: &Call, address: &UrlValue) -> GenResult<CompilationUnit> {
        let program = self.program;
        let def = program.function(&call.callee.text)
                         .ok_or_else(|| RuntimeError::RemoteFunctionNotFound { name: call.callee.text.clone(),
                                                                               at:   call.callee.position(), })?;

        let mut out = String::from(PREAMBLE);
        out.push('\n');
        out.push_str(&format!("public interface {}\n", names.interface));
        out.push_str("{\n");
        out.push_str(&format!("\t{} {}({});\n",
                              lower_type(def.returns.as_ref()),
                              def.name.text,
                              lower_params(def)));
        out.push_str("}\n");
        out.push('\n');

        out.push_str(&format!("public class {} : MarshalByRefObject, {}\n",
                              names.class,
                              names.interface));
        out.push_str("{\n");
        let saved = std::mem::replace(&mut self.modifier, "public ");
        let client_tasks = std::mem::take(&mut self.task_scopes);
        let members = program.root
                             .statements
                             .iter()
                             .filter(|s| !matches!(s, Statement::Function(f) if f.name.text == program.main.text))
                             .try_for_each(|member| -> GenResult<()> {
                                 self.gen_statement(&mut out, member, 1)?;
                                 out.push('\n');
                                 Ok(())
                             });
        self.modifier = saved;
        self.task_scopes = client_tasks;
        members?;
        out.push_str("}\n");
        out.push('\n');

        out.push_str("class Program\n");
        out.push_str("{\n");
        out.push_str("\tstatic void Main()\n");
        out.push_str("\t{\n");
        out.push_str("\t\ttry\n");
        out.push_str("\t\t{\n");
        out.push_str(&format!("\t\t\tChannelServices.RegisterChannel(new TcpChannel({}), false);\n",
                              address.port));
        out.push_str(&format!("\t\t\tRemotingConfiguration.RegisterWellKnownServiceType(Type.GetType(\"{}\"), \"{}\", WellKnownObjectMode.SingleCall);\n",
                              names.class,
                              address.object));
        out.push_str(&format!("\t\t\tConsole.WriteLine(\"{} Server started...\");\n", names.class));
        out.push_str("\t\t\tConsole.WriteLine(\"Press ENTER to quit.\");\n");
        out.push_str("\t\t}\n");
        out.push_str("\t\tcatch (RemotingException) { Console.WriteLine(\"The channel has already been registered.\"); }\n");
        out.push_str("\t\tcatch (System.Net.Sockets.SocketException) { Console.WriteLine(\"Socket address is already been used.\"); }\n");
        out.push_str("\t\tConsole.ReadLine();\n");
        out.push_str("\t}\n");
        out.push_str("}\n");

        Ok(CompilationUnit { name:   names.server.clone(),
                             source: out, })
    }

    /// Records a server unit and, with a toolchain, builds it as a library and
    /// as an executable. Build failures become diagnostics.
    fn publish_server(&mut self, unit: CompilationUnit) {
        info!(unit = %unit.name, "generated server unit");
        if let Some(toolchain) = self.toolchain.as_deref_mut() {
            for kind in [UnitKind::Library, UnitKind::Executable] {
                if let Err(message) = toolchain.build(&unit, kind, &[]) {
                    warn!(unit = %unit.name, ?kind, "server build failed");
                    self.diagnostics.push(format!("{} ({kind:?}): {message}", unit.name));
                }
            }
            self.references.push(unit.name.clone());
        }
        self.servers.push(unit);
    }
}
